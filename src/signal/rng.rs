//! Seeded pseudo-random streams keyed by site seed and sample index.
//!
//! Every draw in a series comes from a fresh [`StdRng`] whose seed mixes the
//! site seed, a stream tag and an index. Nothing is shared between calls, so
//! a sample's randomness depends only on those three values.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Independent sub-streams of one site seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Per-site constants (phases, baseload).
    Site,
    /// Per-sample pattern noise.
    Pattern,
    /// Per-sample forecast bias.
    Bias,
    /// Per-local-day solar cloudiness.
    Day,
}

impl Stream {
    fn tag(self) -> u64 {
        match self {
            Self::Site => 0x5349_5445,
            Self::Pattern => 0x5041_5454,
            Self::Bias => 0x4249_4153,
            Self::Day => 0x4441_5953,
        }
    }
}

/// Factory of deterministic RNGs for one site.
#[derive(Debug, Clone, Copy)]
pub struct SeededStream {
    seed: u64,
}

impl SeededStream {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the generator for `stream` at `index`.
    pub fn rng(&self, stream: Stream, index: i64) -> StdRng {
        let keyed = splitmix64(self.seed ^ splitmix64(stream.tag()));
        StdRng::seed_from_u64(splitmix64(keyed ^ index as u64))
    }
}

/// SplitMix64 finalizer.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Standard normal draw using the Box-Muller transform.
pub fn standard_normal(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

/// Gaussian noise with mean 0 and the given standard deviation.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    standard_normal(rng) * std_dev
}

//! Forecast bias band around the base pattern.

use super::pattern::Slot;
use super::rng::{SeededStream, Stream, standard_normal};
use crate::config::BandConfig;

/// Standard deviation law of the forecast bias for one site type.
///
/// At or before `now` the bias has a fixed residual spread. After `now` the
/// spread grows linearly from `min_std` to `max_std` at the far horizon edge.
/// Draws are truncated at `clip_sigmas` standard deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyBand {
    pub residual_std: f32,
    pub min_std: f32,
    pub max_std: f32,
    pub clip_sigmas: f32,
}

impl UncertaintyBand {
    pub fn new(band: &BandConfig, clip_sigmas: f32) -> Self {
        Self {
            residual_std: band.residual_std,
            min_std: band.min_std,
            max_std: band.max_std,
            clip_sigmas,
        }
    }

    /// Bias standard deviation at `lead_hours` past `now` for a window
    /// reaching `horizon_hours` into the future.
    pub fn std_at(&self, lead_hours: f64, horizon_hours: f64) -> f32 {
        if lead_hours <= 0.0 {
            return self.residual_std;
        }
        let frac = if horizon_hours > 0.0 {
            (lead_hours / horizon_hours).min(1.0) as f32
        } else {
            1.0
        };
        self.min_std + (self.max_std - self.min_std) * frac
    }

    /// Largest absolute bias for the given spread.
    pub fn max_abs_bias(&self, std: f32) -> f32 {
        std * self.clip_sigmas
    }

    /// Seeded, truncated bias for `slot`, scaled by `envelope`.
    pub fn bias(&self, std: f32, envelope: f32, slot: &Slot, stream: &SeededStream) -> f32 {
        let mut rng = stream.rng(Stream::Bias, slot.index);
        let z = standard_normal(&mut rng).clamp(-self.clip_sigmas, self.clip_sigmas);
        z * std * envelope
    }
}

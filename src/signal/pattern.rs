//! Per-type base patterns returning utilization in `[0, 1]`.
//!
//! One [`SitePattern`] variant is selected per series; each variant draws its
//! per-site constants once from the site stream and its per-sample noise from
//! the pattern stream at the sample's grid index.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use rand::Rng;

use super::rng::{SeededStream, Stream, gaussian_noise};
use crate::config::{DemandConfig, GeneratorConfig, SolarConfig, WindConfig};
use crate::site::SiteType;

/// A sample's position on the absolute and local clocks.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    /// Whole hours since the Unix epoch; keys the per-sample streams.
    pub index: i64,
    /// Fractional hours since the Unix epoch.
    pub hours: f64,
    /// Fractional local hour of day in `[0, 24)`.
    pub local_hour: f32,
    /// Local calendar day number.
    pub local_day: i64,
}

impl Slot {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        let secs = at.timestamp();
        let local = at.naive_local();
        let local_hour = local.hour() as f32
            + local.minute() as f32 / 60.0
            + local.second() as f32 / 3600.0;
        Self {
            index: secs.div_euclid(3600),
            hours: secs as f64 / 3600.0,
            local_hour,
            local_day: i64::from(local.date().num_days_from_ce()),
        }
    }
}

/// Wind output: gust cycle and weather-system swing around a mean, plus noise.
#[derive(Debug, Clone)]
pub struct WindPattern {
    mean: f32,
    gust_amplitude: f32,
    gust_omega: f64,
    gust_phase: f64,
    synoptic_amplitude: f32,
    synoptic_omega: f64,
    synoptic_phase: f64,
    noise_std: f32,
}

impl WindPattern {
    /// Builds the pattern; oscillation phases come from the site stream.
    pub fn new(config: &WindConfig, stream: &SeededStream) -> Self {
        let mut rng = stream.rng(Stream::Site, 0);
        let gust_phase = rng.random::<f64>() * TAU;
        let synoptic_phase = rng.random::<f64>() * TAU;
        Self {
            mean: config.mean_utilization,
            gust_amplitude: config.gust_amplitude,
            gust_omega: TAU / f64::from(config.gust_period_hours),
            gust_phase,
            synoptic_amplitude: config.synoptic_amplitude,
            synoptic_omega: TAU / f64::from(config.synoptic_period_hours),
            synoptic_phase,
            noise_std: config.noise_std,
        }
    }

    pub fn utilization(&self, slot: &Slot, stream: &SeededStream) -> f32 {
        let gust = (self.gust_omega * slot.hours + self.gust_phase).sin() as f32;
        let synoptic = (self.synoptic_omega * slot.hours + self.synoptic_phase).sin() as f32;
        let mut rng = stream.rng(Stream::Pattern, slot.index);
        let noise = gaussian_noise(&mut rng, self.noise_std);
        (self.mean + self.gust_amplitude * gust + self.synoptic_amplitude * synoptic + noise)
            .clamp(0.0, 1.0)
    }
}

/// Solar output: half-sine between sunrise and sunset, damped per local day.
#[derive(Debug, Clone)]
pub struct SolarPattern {
    sunrise_hour: f32,
    sunset_hour: f32,
    clear_sky_peak: f32,
    max_cloud_damping: f32,
}

impl SolarPattern {
    pub fn new(config: &SolarConfig) -> Self {
        Self {
            sunrise_hour: config.sunrise_hour,
            sunset_hour: config.sunset_hour,
            clear_sky_peak: config.clear_sky_peak,
            max_cloud_damping: config.max_cloud_damping,
        }
    }

    /// Normalized clear-sky shape: 0 at night, 1 at solar noon.
    pub fn daylight_frac(&self, local_hour: f32) -> f32 {
        if local_hour < self.sunrise_hour || local_hour >= self.sunset_hour {
            return 0.0;
        }
        let day_len = self.sunset_hour - self.sunrise_hour;
        let x = (local_hour - self.sunrise_hour) / day_len;
        (std::f32::consts::PI * x).sin().max(0.0)
    }

    /// Multiplier in `(1 - max_cloud_damping, 1]`, constant over a local day.
    pub fn cloudiness(&self, local_day: i64, stream: &SeededStream) -> f32 {
        let mut rng = stream.rng(Stream::Day, local_day);
        1.0 - self.max_cloud_damping * rng.random::<f32>()
    }

    pub fn utilization(&self, slot: &Slot, stream: &SeededStream) -> f32 {
        let frac = self.daylight_frac(slot.local_hour);
        if frac <= 0.0 {
            return 0.0;
        }
        (self.clear_sky_peak * frac * self.cloudiness(slot.local_day, stream)).clamp(0.0, 1.0)
    }
}

/// Demand: seeded baseload with morning and evening bells, plus noise.
#[derive(Debug, Clone)]
pub struct DemandPattern {
    baseload: f32,
    morning_peak_hour: f32,
    morning_amplitude: f32,
    evening_peak_hour: f32,
    evening_amplitude: f32,
    peak_width_hours: f32,
    noise_std: f32,
}

impl DemandPattern {
    /// Builds the pattern; the baseload fraction comes from the site stream.
    pub fn new(config: &DemandConfig, stream: &SeededStream) -> Self {
        let mut rng = stream.rng(Stream::Site, 0);
        let span = config.baseload_max - config.baseload_min;
        Self {
            baseload: config.baseload_min + span * rng.random::<f32>(),
            morning_peak_hour: config.morning_peak_hour,
            morning_amplitude: config.morning_amplitude,
            evening_peak_hour: config.evening_peak_hour,
            evening_amplitude: config.evening_amplitude,
            peak_width_hours: config.peak_width_hours,
            noise_std: config.noise_std,
        }
    }

    /// Floor the pattern never goes below.
    pub fn baseload(&self) -> f32 {
        self.baseload
    }

    fn bell(&self, local_hour: f32, center: f32) -> f32 {
        let d = (local_hour - center).abs();
        let d = d.min(24.0 - d);
        let z = d / self.peak_width_hours;
        (-0.5 * z * z).exp()
    }

    /// Noise-free daily shape.
    pub fn profile(&self, local_hour: f32) -> f32 {
        self.baseload
            + self.morning_amplitude * self.bell(local_hour, self.morning_peak_hour)
            + self.evening_amplitude * self.bell(local_hour, self.evening_peak_hour)
    }

    pub fn utilization(&self, slot: &Slot, stream: &SeededStream) -> f32 {
        let mut rng = stream.rng(Stream::Pattern, slot.index);
        let noise = gaussian_noise(&mut rng, self.noise_std);
        (self.profile(slot.local_hour) + noise).max(self.baseload).min(1.0)
    }
}

/// Pattern selected once per series from the site type.
#[derive(Debug, Clone)]
pub enum SitePattern {
    Wind(WindPattern),
    Solar(SolarPattern),
    Demand(DemandPattern),
}

impl SitePattern {
    pub fn for_site(site_type: SiteType, config: &GeneratorConfig, stream: &SeededStream) -> Self {
        match site_type {
            SiteType::Wind => Self::Wind(WindPattern::new(&config.wind, stream)),
            SiteType::Solar => Self::Solar(SolarPattern::new(&config.solar)),
            SiteType::Demand => Self::Demand(DemandPattern::new(&config.demand, stream)),
        }
    }

    /// Base pattern value `p(t)` in `[0, 1]`.
    pub fn utilization(&self, slot: &Slot, stream: &SeededStream) -> f32 {
        match self {
            Self::Wind(p) => p.utilization(slot, stream),
            Self::Solar(p) => p.utilization(slot, stream),
            Self::Demand(p) => p.utilization(slot, stream),
        }
    }

    /// Scale applied to the forecast bias at this slot.
    ///
    /// Solar bias follows the clear-sky shape so nights forecast zero.
    pub fn bias_envelope(&self, slot: &Slot) -> f32 {
        match self {
            Self::Solar(p) => p.daylight_frac(slot.local_hour),
            Self::Wind(_) | Self::Demand(_) => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Slot {
        Slot::new(DateTime::parse_from_rfc3339(s).unwrap())
    }

    fn stream() -> SeededStream {
        SeededStream::new(42)
    }

    #[test]
    fn slot_uses_local_clock() {
        let slot = at("2024-06-15T12:30:00+02:00");
        assert!((slot.local_hour - 12.5).abs() < 1e-6);
        // 10:30 UTC
        assert_eq!(slot.index, at("2024-06-15T10:00:00+00:00").index);
    }

    #[test]
    fn slot_index_is_floor_before_epoch() {
        let slot = at("1969-12-31T23:30:00+00:00");
        assert_eq!(slot.index, -1);
    }

    #[test]
    fn daylight_frac_shape() {
        let pv = SolarPattern::new(&SolarConfig::default());
        assert_eq!(pv.daylight_frac(0.0), 0.0);
        assert_eq!(pv.daylight_frac(5.9), 0.0);
        assert_eq!(pv.daylight_frac(18.0), 0.0);
        assert_eq!(pv.daylight_frac(23.0), 0.0);
        assert!(pv.daylight_frac(6.0) < 0.1);
        assert!(pv.daylight_frac(12.0) > 0.999);
        assert!((pv.daylight_frac(9.0) - pv.daylight_frac(15.0)).abs() < 1e-5);
    }

    #[test]
    fn solar_is_zero_at_night() {
        let pv = SolarPattern::new(&SolarConfig::default());
        assert_eq!(pv.utilization(&at("2024-06-15T00:00:00+00:00"), &stream()), 0.0);
        assert_eq!(pv.utilization(&at("2024-06-15T03:00:00+00:00"), &stream()), 0.0);
        assert_eq!(pv.utilization(&at("2024-06-15T21:00:00+00:00"), &stream()), 0.0);
    }

    #[test]
    fn solar_noon_stays_within_cloud_damping() {
        let pv = SolarPattern::new(&SolarConfig::default());
        for seed in 0..200 {
            let u = pv.utilization(&at("2024-06-15T12:00:00+00:00"), &SeededStream::new(seed));
            assert!(u >= 0.6 * 0.6 - 1e-5 && u <= 0.6 + 1e-5, "seed {seed}: {u}");
        }
    }

    #[test]
    fn cloudiness_is_constant_within_a_day() {
        let pv = SolarPattern::new(&SolarConfig::default());
        let morning = at("2024-06-15T09:00:00+00:00");
        let afternoon = at("2024-06-15T15:00:00+00:00");
        let u1 = pv.utilization(&morning, &stream());
        let u2 = pv.utilization(&afternoon, &stream());
        assert!((u1 - u2).abs() < 1e-5);
    }

    #[test]
    fn wind_stays_in_unit_interval_and_varies() {
        let wind = WindPattern::new(&WindConfig::default(), &stream());
        let base = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        let values: Vec<f32> = (0..24 * 30)
            .map(|h| wind.utilization(&Slot::new(base + chrono::TimeDelta::hours(h)), &stream()))
            .collect();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        assert!((mean - 0.35).abs() < 0.08, "mean utilization {mean}");
        let min = values.iter().cloned().fold(f32::MAX, f32::min);
        let max = values.iter().cloned().fold(f32::MIN, f32::max);
        assert!(min < 0.1, "min {min}");
        assert!(max > 0.75, "max {max}");
    }

    #[test]
    fn demand_has_two_peaks_and_a_floor() {
        let demand = DemandPattern::new(&DemandConfig::default(), &stream());
        assert!((0.15..=0.25).contains(&demand.baseload()));
        let night = demand.profile(3.0);
        let morning = demand.profile(8.0);
        let midday = demand.profile(13.0);
        let evening = demand.profile(19.0);
        assert!(morning > night);
        assert!(morning > midday);
        assert!(evening > midday);
        assert!(evening > morning);
    }

    #[test]
    fn demand_never_below_baseload() {
        let demand = DemandPattern::new(&DemandConfig::default(), &stream());
        let base = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        for h in 0..24 * 14 {
            let u = demand.utilization(&Slot::new(base + chrono::TimeDelta::hours(h)), &stream());
            assert!(u >= demand.baseload() && u <= 1.0);
        }
    }

    #[test]
    fn evening_bell_wraps_midnight() {
        let cfg = DemandConfig {
            evening_peak_hour: 23.0,
            morning_amplitude: 0.0,
            ..DemandConfig::default()
        };
        let demand = DemandPattern::new(&cfg, &stream());
        assert!((demand.profile(0.5) - demand.profile(21.5)).abs() < 1e-5);
    }

    #[test]
    fn dispatch_matches_site_type() {
        let cfg = GeneratorConfig::default();
        assert!(matches!(
            SitePattern::for_site(SiteType::Wind, &cfg, &stream()),
            SitePattern::Wind(_)
        ));
        assert!(matches!(
            SitePattern::for_site(SiteType::Solar, &cfg, &stream()),
            SitePattern::Solar(_)
        ));
        assert!(matches!(
            SitePattern::for_site(SiteType::Demand, &cfg, &stream()),
            SitePattern::Demand(_)
        ));
    }

    #[test]
    fn only_solar_shapes_the_bias() {
        let cfg = GeneratorConfig::default();
        let night = at("2024-06-15T01:00:00+00:00");
        let solar = SitePattern::for_site(SiteType::Solar, &cfg, &stream());
        let wind = SitePattern::for_site(SiteType::Wind, &cfg, &stream());
        assert_eq!(solar.bias_envelope(&night), 0.0);
        assert_eq!(wind.bias_envelope(&night), 1.0);
    }
}

//! TOML-based portfolio configuration, generator tuning and presets.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::signal::window::Window;
use crate::site::{SiteDescriptor, SiteRecord, SiteType};

/// Top-level portfolio: generator tuning plus the list of sites.
///
/// Load from TOML with [`PortfolioConfig::from_toml_file`] or pick a built-in
/// preset with [`PortfolioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Pattern and uncertainty constants.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Sites to generate series for.
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
}

/// Tunable constants of the signal generator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Default sampling window.
    #[serde(default)]
    pub window: Window,
    /// Wind pattern parameters.
    #[serde(default)]
    pub wind: WindConfig,
    /// Solar pattern parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Demand pattern parameters.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Forecast error bands.
    #[serde(default)]
    pub uncertainty: UncertaintyConfig,
}

/// Wind pattern: two slow oscillations plus fast noise around a mean.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Mean utilization of capacity (0.0-1.0).
    pub mean_utilization: f32,
    /// Period of the gust cycle (hours).
    pub gust_period_hours: f32,
    /// Amplitude of the gust cycle (fraction of capacity).
    pub gust_amplitude: f32,
    /// Period of the slow weather-system swing (hours).
    pub synoptic_period_hours: f32,
    /// Amplitude of the weather-system swing (fraction of capacity).
    pub synoptic_amplitude: f32,
    /// Standard deviation of the hourly noise (fraction of capacity).
    pub noise_std: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            mean_utilization: 0.35,
            gust_period_hours: 7.0,
            gust_amplitude: 0.2,
            synoptic_period_hours: 40.0,
            synoptic_amplitude: 0.3,
            noise_std: 0.08,
        }
    }
}

/// Solar pattern: diurnal half-sine damped by daily cloudiness.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Local hour of sunrise (inclusive).
    pub sunrise_hour: f32,
    /// Local hour of sunset (exclusive).
    pub sunset_hour: f32,
    /// Clear-sky utilization at solar noon (0.0-1.0).
    pub clear_sky_peak: f32,
    /// Largest fraction of the peak removed by clouds on a given day.
    pub max_cloud_damping: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            clear_sky_peak: 0.6,
            max_cloud_damping: 0.4,
        }
    }
}

/// Demand pattern: seeded baseload with morning and evening ramps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Lower bound of the per-site baseload fraction.
    pub baseload_min: f32,
    /// Upper bound of the per-site baseload fraction.
    pub baseload_max: f32,
    /// Local hour of the morning peak.
    pub morning_peak_hour: f32,
    /// Morning peak height above baseload (fraction of capacity).
    pub morning_amplitude: f32,
    /// Local hour of the evening peak.
    pub evening_peak_hour: f32,
    /// Evening peak height above baseload (fraction of capacity).
    pub evening_amplitude: f32,
    /// Standard deviation of each peak's bell (hours).
    pub peak_width_hours: f32,
    /// Standard deviation of the hourly noise (fraction of capacity).
    pub noise_std: f32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            baseload_min: 0.15,
            baseload_max: 0.25,
            morning_peak_hour: 8.0,
            morning_amplitude: 0.35,
            evening_peak_hour: 19.0,
            evening_amplitude: 0.5,
            peak_width_hours: 2.0,
            noise_std: 0.02,
        }
    }
}

/// Forecast error band of one site type, as fractions of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandConfig {
    /// Standard deviation of the historical forecast residual.
    pub residual_std: f32,
    /// Standard deviation just after `now`.
    pub min_std: f32,
    /// Standard deviation at the far horizon edge.
    pub max_std: f32,
}

/// Forecast error bands for all site types.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncertaintyConfig {
    /// Bias draws are truncated at this many standard deviations.
    pub clip_sigmas: f32,
    pub wind: BandConfig,
    pub solar: BandConfig,
    pub demand: BandConfig,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            clip_sigmas: 3.0,
            wind: BandConfig {
                residual_std: 0.04,
                min_std: 0.04,
                max_std: 0.25,
            },
            solar: BandConfig {
                residual_std: 0.03,
                min_std: 0.03,
                max_std: 0.12,
            },
            demand: BandConfig {
                residual_std: 0.02,
                min_std: 0.02,
                max_std: 0.05,
            },
        }
    }
}

impl UncertaintyConfig {
    /// Band for the given site type.
    pub fn band(&self, site_type: SiteType) -> &BandConfig {
        match site_type {
            SiteType::Wind => &self.wind,
            SiteType::Solar => &self.solar,
            SiteType::Demand => &self.demand,
        }
    }

    /// Largest `|actual - forecast|` a historical sample can show, as a
    /// fraction of capacity.
    pub fn max_historical_error(&self, site_type: SiteType) -> f32 {
        self.band(site_type).residual_std * self.clip_sigmas
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generator.solar.sunrise_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn site(id: &str, name: &str, site_type: &str, capacity_mw: f32, seed: u64) -> SiteRecord {
    SiteRecord {
        id: Some(id.to_string()),
        name: name.to_string(),
        site_type: site_type.to_string(),
        capacity_mw: Some(capacity_mw),
        seed: Some(seed),
    }
}

impl PortfolioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "solar_noon"];

    /// The dashboard's initial sites.
    pub fn demo() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            sites: vec![
                site("iceloss-wind", "Iceloss Wind", "wind", 150.0, 11),
                site("demand-area", "Demand Area", "demand", 2.4, 23),
                site("solar-site", "Solar Site", "solar", 1.0, 37),
                site("demand_se3", "demand_se3", "demand", 12_000.0, 41),
            ],
        }
    }

    /// A single 100 MW solar park.
    pub fn solar_noon() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            sites: vec![site("solar-park", "Solar Park", "solar", 100.0, 7)],
        }
    }

    /// Loads a portfolio from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "solar_noon" => Ok(Self::solar_noon()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a portfolio from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a portfolio from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Converts every site record into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns the first failing record as `sites[i].<field>`, or `sites` when
    /// two records share an id.
    pub fn descriptors(&self) -> Result<Vec<SiteDescriptor>, ConfigError> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.sites.len());
        for (i, record) in self.sites.iter().enumerate() {
            let descriptor = SiteDescriptor::try_from(record).map_err(|e| {
                ConfigError::new(format!("sites[{i}].{}", e.field()), e.to_string())
            })?;
            if !seen.insert(descriptor.id.clone()) {
                return Err(ConfigError::new(
                    "sites",
                    format!("duplicate site id \"{}\"", descriptor.id),
                ));
            }
            out.push(descriptor);
        }
        Ok(out)
    }

    /// Validates generator constants and site records.
    ///
    /// Returns an empty vector if the portfolio is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.generator.validate();
        if let Err(e) = self.descriptors() {
            errors.push(e);
        }
        errors
    }
}

impl GeneratorConfig {
    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.window.validate() {
            errors.push(ConfigError::new(
                format!("generator.window.{}", e.field()),
                e.to_string(),
            ));
        }

        let w = &self.wind;
        if !(0.0..=1.0).contains(&w.mean_utilization) {
            errors.push(ConfigError::new(
                "generator.wind.mean_utilization",
                "must be in [0.0, 1.0]",
            ));
        }
        for (field, value) in [
            ("gust_period_hours", w.gust_period_hours),
            ("synoptic_period_hours", w.synoptic_period_hours),
        ] {
            if !(value > 0.0) {
                errors.push(ConfigError::new(
                    format!("generator.wind.{field}"),
                    "must be > 0",
                ));
            }
        }
        for (field, value) in [
            ("gust_amplitude", w.gust_amplitude),
            ("synoptic_amplitude", w.synoptic_amplitude),
            ("noise_std", w.noise_std),
        ] {
            if !(value >= 0.0) {
                errors.push(ConfigError::new(
                    format!("generator.wind.{field}"),
                    "must be >= 0",
                ));
            }
        }

        let sol = &self.solar;
        if !(0.0 <= sol.sunrise_hour && sol.sunrise_hour < sol.sunset_hour) {
            errors.push(ConfigError::new(
                "generator.solar.sunrise_hour",
                "must be >= 0 and < generator.solar.sunset_hour",
            ));
        }
        if !(sol.sunset_hour <= 24.0) {
            errors.push(ConfigError::new(
                "generator.solar.sunset_hour",
                "must be <= 24",
            ));
        }
        if !(sol.clear_sky_peak > 0.0 && sol.clear_sky_peak <= 1.0) {
            errors.push(ConfigError::new(
                "generator.solar.clear_sky_peak",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(0.0..=1.0).contains(&sol.max_cloud_damping) {
            errors.push(ConfigError::new(
                "generator.solar.max_cloud_damping",
                "must be in [0.0, 1.0]",
            ));
        }

        let d = &self.demand;
        if !(0.0 <= d.baseload_min && d.baseload_min <= d.baseload_max && d.baseload_max < 1.0) {
            errors.push(ConfigError::new(
                "generator.demand.baseload_min",
                "must satisfy 0 <= baseload_min <= baseload_max < 1",
            ));
        }
        for (field, value) in [
            ("morning_peak_hour", d.morning_peak_hour),
            ("evening_peak_hour", d.evening_peak_hour),
        ] {
            if !(0.0..24.0).contains(&value) {
                errors.push(ConfigError::new(
                    format!("generator.demand.{field}"),
                    "must be in [0, 24)",
                ));
            }
        }
        for (field, value) in [
            ("morning_amplitude", d.morning_amplitude),
            ("evening_amplitude", d.evening_amplitude),
            ("noise_std", d.noise_std),
        ] {
            if !(value >= 0.0) {
                errors.push(ConfigError::new(
                    format!("generator.demand.{field}"),
                    "must be >= 0",
                ));
            }
        }
        if !(d.peak_width_hours > 0.0) {
            errors.push(ConfigError::new(
                "generator.demand.peak_width_hours",
                "must be > 0",
            ));
        }

        let u = &self.uncertainty;
        if !(u.clip_sigmas > 0.0) {
            errors.push(ConfigError::new(
                "generator.uncertainty.clip_sigmas",
                "must be > 0",
            ));
        }
        for site_type in SiteType::ALL {
            let band = u.band(site_type);
            if !(0.0 <= band.residual_std && band.residual_std <= band.min_std) {
                errors.push(ConfigError::new(
                    format!("generator.uncertainty.{site_type}.residual_std"),
                    "must satisfy 0 <= residual_std <= min_std",
                ));
            }
            if !(0.0 <= band.min_std && band.min_std <= band.max_std) {
                errors.push(ConfigError::new(
                    format!("generator.uncertainty.{site_type}.min_std"),
                    "must satisfy 0 <= min_std <= max_std",
                ));
            }
        }

        errors
    }
}

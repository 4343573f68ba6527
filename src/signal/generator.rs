//! The sampling loop turning a site descriptor into a series.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::pattern::{SitePattern, Slot};
use super::rng::SeededStream;
use super::types::{Sample, SignalSeries};
use super::uncertainty::UncertaintyBand;
use super::window::Window;
use crate::config::{ConfigError, GeneratorConfig};
use crate::error::SignalError;
use crate::site::SiteDescriptor;
use crate::site::types::check_capacity;

/// Stateless generator of actual-vs-forecast series.
///
/// Holds only its tuning constants; every call is a pure function of the
/// descriptor, `now` and the window. The constants are validated once at
/// construction, so generation never sees an inconsistent configuration.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use site_signals::signal::SignalGenerator;
/// use site_signals::site::{SiteDescriptor, SiteType};
///
/// let site = SiteDescriptor::new("pv", "PV", SiteType::Solar, 100.0, 7).unwrap();
/// let now = DateTime::parse_from_rfc3339("2024-06-15T12:00:00+00:00").unwrap();
/// let series = SignalGenerator::default().generate(&site, now).unwrap();
/// assert_eq!(series.len(), 121);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: GeneratorConfig,
}

impl SignalGenerator {
    /// Creates a generator from checked tuning constants.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint of [`GeneratorConfig::validate`].
    pub fn new(config: GeneratorConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a series over the configured default window.
    ///
    /// # Errors
    ///
    /// See [`SignalGenerator::generate_window`].
    pub fn generate(
        &self,
        site: &SiteDescriptor,
        now: DateTime<FixedOffset>,
    ) -> Result<SignalSeries, SignalError> {
        self.generate_window(site, now, self.config.window)
    }

    /// Generates a series over `window` around `now`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive capacity or an invalid
    /// window. Validation happens before any sample is produced.
    pub fn generate_window(
        &self,
        site: &SiteDescriptor,
        now: DateTime<FixedOffset>,
        window: Window,
    ) -> Result<SignalSeries, SignalError> {
        check_capacity(site.capacity_mw)?;
        window.validate()?;

        let stream = SeededStream::new(site.seed);
        let pattern = SitePattern::for_site(site.site_type, &self.config, &stream);
        let band = UncertaintyBand::new(
            self.config.uncertainty.band(site.site_type),
            self.config.uncertainty.clip_sigmas,
        );
        let horizon_hours = window.future_hours as f64;
        let capacity = site.capacity_mw;

        let samples: Vec<Sample> = window
            .timestamps(now)
            .map(|timestamp| {
                let slot = Slot::new(timestamp);
                let p = pattern.utilization(&slot, &stream);
                let lead_hours = (timestamp - now).num_seconds() as f64 / 3600.0;
                let std = band.std_at(lead_hours, horizon_hours);
                let bias = band.bias(std, pattern.bias_envelope(&slot), &slot, &stream);
                Sample {
                    timestamp,
                    capacity,
                    actual: (timestamp <= now).then_some(capacity * p),
                    forecast: capacity * (p + bias).clamp(0.0, 1.0),
                }
            })
            .collect();

        debug!(
            site = %site.id,
            site_type = %site.site_type,
            samples = samples.len(),
            now = %now,
            "generated signal series"
        );
        Ok(SignalSeries::new(
            site.clone(),
            now,
            window.step_hours,
            samples,
        ))
    }
}

/// Generates a series with default constants and the default window.
///
/// # Errors
///
/// Returns `InvalidParameter` when the descriptor's capacity is not positive.
pub fn generate(
    site: &SiteDescriptor,
    now: DateTime<FixedOffset>,
) -> Result<SignalSeries, SignalError> {
    SignalGenerator::default().generate(site, now)
}

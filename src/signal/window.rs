use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Largest accepted value for any window field (about 100 years of hours).
pub const MAX_WINDOW_HOURS: i64 = 24 * 366 * 100;

/// Largest number of samples a single series may hold.
pub const MAX_SAMPLES: usize = 100_000;

/// Sampling window around the `now` instant.
///
/// Covers the closed range `[now - past_hours, now + future_hours]`, stepped
/// by `step_hours` from the start.
///
/// # Examples
///
/// ```
/// use site_signals::signal::window::Window;
///
/// let window = Window::default();
/// assert_eq!(window.sample_count(), 121);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Window {
    /// Hours of history before `now` (>= 0).
    pub past_hours: i64,
    /// Hours of forecast after `now` (>= 0).
    pub future_hours: i64,
    /// Spacing between samples in hours (> 0).
    pub step_hours: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            past_hours: 24,
            future_hours: 96,
            step_hours: 1,
        }
    }
}

impl Window {
    pub fn new(past_hours: i64, future_hours: i64, step_hours: i64) -> Self {
        Self {
            past_hours,
            future_hours,
            step_hours,
        }
    }

    /// Checks the window before anything is generated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming `past_hours`, `future_hours`,
    /// `step_hours`, or `window` when the sample count exceeds [`MAX_SAMPLES`].
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.past_hours < 0 {
            return Err(SignalError::invalid(
                "past_hours",
                format!("must be >= 0, got {}", self.past_hours),
            ));
        }
        if self.future_hours < 0 {
            return Err(SignalError::invalid(
                "future_hours",
                format!("must be >= 0, got {}", self.future_hours),
            ));
        }
        if self.step_hours <= 0 {
            return Err(SignalError::invalid(
                "step_hours",
                format!("must be > 0, got {}", self.step_hours),
            ));
        }
        for (field, value) in [
            ("past_hours", self.past_hours),
            ("future_hours", self.future_hours),
            ("step_hours", self.step_hours),
        ] {
            if value > MAX_WINDOW_HOURS {
                return Err(SignalError::invalid(
                    field,
                    format!("must be <= {MAX_WINDOW_HOURS}, got {value}"),
                ));
            }
        }
        let count = self.sample_count();
        if count > MAX_SAMPLES {
            return Err(SignalError::invalid(
                "window",
                format!("would produce {count} samples, limit is {MAX_SAMPLES}"),
            ));
        }
        Ok(())
    }

    /// Number of samples in the window. Only meaningful after [`Window::validate`].
    pub fn sample_count(&self) -> usize {
        let span = self.past_hours + self.future_hours;
        (span / self.step_hours) as usize + 1
    }

    /// First timestamp of the window.
    pub fn start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        now - TimeDelta::hours(self.past_hours)
    }

    /// Timestamps of every sample, in increasing order.
    pub fn timestamps(
        &self,
        now: DateTime<FixedOffset>,
    ) -> impl Iterator<Item = DateTime<FixedOffset>> + use<> {
        let start = self.start(now);
        let step = self.step_hours;
        (0..self.sample_count()).map(move |k| start + TimeDelta::hours(k as i64 * step))
    }
}

/// Drops minutes, seconds and sub-second parts on the UTC hour grid,
/// keeping the offset.
pub fn truncate_to_hour(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let extra_secs = t.timestamp().rem_euclid(3600);
    t - TimeDelta::seconds(extra_secs) - TimeDelta::nanoseconds(i64::from(t.timestamp_subsec_nanos()))
}

//! API query and response types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::signal::window::{Window, truncate_to_hour};

/// Optional overrides for the series endpoints.
///
/// Values stay raw strings so a malformed number is reported against its own
/// parameter name.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    /// RFC 3339 reference instant; current hour when absent.
    pub now: Option<String>,
    pub past_hours: Option<String>,
    pub future_hours: Option<String>,
    pub step_hours: Option<String>,
}

fn hours(field: &'static str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ApiError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

impl SeriesQuery {
    /// Resolves `now`, falling back to the current UTC hour.
    pub fn now(&self) -> Result<DateTime<FixedOffset>, ApiError> {
        match &self.now {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map_err(|_| ApiError::InvalidNow(raw.clone())),
            None => Ok(truncate_to_hour(chrono::Utc::now().fixed_offset())),
        }
    }

    /// Applies the overrides on top of `defaults`.
    ///
    /// Range checks are left to [`Window::validate`].
    pub fn window(&self, defaults: Window) -> Result<Window, ApiError> {
        Ok(Window {
            past_hours: hours("past_hours", self.past_hours.as_deref(), defaults.past_hours)?,
            future_hours: hours(
                "future_hours",
                self.future_hours.as_deref(),
                defaults.future_hours,
            )?,
            step_hours: hours("step_hours", self.step_hours.as_deref(), defaults.step_hours)?,
        })
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Offending parameter, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

//! Error type shared by site descriptors and the signal generator.

use thiserror::Error;

/// Failure raised before any output is produced.
///
/// Every rejected input (zero capacity, missing seed, unknown site type, an
/// empty or oversized window) reduces to `InvalidParameter`, naming the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

impl SignalError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the parameter that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidParameter { field, .. } => field,
        }
    }
}

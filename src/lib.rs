//! Synthetic actual-vs-forecast power series for wind, solar and demand sites.
//!
//! Every series is a pure function of a [`site::SiteDescriptor`], a `now`
//! instant and a [`signal::Window`]: history up to `now` carries actuals,
//! the whole window carries a forecast whose error band widens with lead time.

#[cfg(feature = "api")]
pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
/// Pattern models, uncertainty bands and the series generator.
pub mod signal;
pub mod site;
pub mod telemetry;

pub use error::SignalError;

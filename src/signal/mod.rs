//! Synthetic actual-vs-forecast series generation.

pub mod generator;
/// Per-type base pattern functions.
pub mod pattern;
/// Seeded pseudo-random streams.
pub mod rng;
pub mod summary;
pub mod types;
/// Forecast bias band.
pub mod uncertainty;
/// Sampling window around `now`.
pub mod window;

pub use generator::{SignalGenerator, generate};
pub use summary::SeriesSummary;
pub use types::{Sample, SignalSeries};
pub use window::Window;

//! File output for generated series.

pub mod export;

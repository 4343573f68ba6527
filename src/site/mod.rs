//! Site descriptors and their raw portfolio records.

pub mod types;

pub use types::{SiteDescriptor, SiteRecord, SiteType, slugify};

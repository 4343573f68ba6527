//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};

use site_signals::site::{SiteDescriptor, SiteType};

/// Fixed reference instant: 2024-06-15 12:00 UTC (a Saturday, solar noon).
pub fn fixed_now() -> DateTime<FixedOffset> {
    at("2024-06-15T12:00:00+00:00")
}

/// Parses an RFC 3339 timestamp.
pub fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// 150 MW wind farm, seed 11.
pub fn wind_site() -> SiteDescriptor {
    SiteDescriptor::new("iceloss-wind", "Iceloss Wind", SiteType::Wind, 150.0, 11).unwrap()
}

/// 100 MW solar park, seed 7.
pub fn solar_site() -> SiteDescriptor {
    SiteDescriptor::new("solar-park", "Solar Park", SiteType::Solar, 100.0, 7).unwrap()
}

/// 2.4 MW demand area, seed 23.
pub fn demand_site() -> SiteDescriptor {
    SiteDescriptor::new("demand-area", "Demand Area", SiteType::Demand, 2.4, 23).unwrap()
}

/// One site of every type.
pub fn all_sites() -> Vec<SiteDescriptor> {
    vec![wind_site(), solar_site(), demand_site()]
}

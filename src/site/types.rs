//! Site descriptors as handed over by the storage layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Kind of site, selecting the pattern function and noise profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Wind,
    Solar,
    Demand,
}

impl SiteType {
    pub const ALL: [SiteType; 3] = [SiteType::Wind, SiteType::Solar, SiteType::Demand];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wind => "wind",
            Self::Solar => "solar",
            Self::Demand => "demand",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteType {
    type Err = SignalError;

    /// Accepts `wind`, `solar` and `demand` in any case; `load` is kept as an
    /// alias for `demand`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wind" => Ok(Self::Wind),
            "solar" => Ok(Self::Solar),
            "demand" | "load" => Ok(Self::Demand),
            other => Err(SignalError::invalid(
                "type",
                format!("unknown site type \"{other}\", expected wind, solar or demand"),
            )),
        }
    }
}

/// Immutable description of one site.
///
/// The generator only reads it; all randomness for the site's series is
/// derived from `seed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDescriptor {
    /// Unique site identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Site kind.
    #[serde(rename = "type")]
    pub site_type: SiteType,
    /// Nameplate capacity (MW, > 0).
    pub capacity_mw: f32,
    /// Seed of the site's pseudo-random streams.
    pub seed: u64,
}

impl SiteDescriptor {
    /// Creates a descriptor, rejecting empty ids and non-positive capacity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` on `id` or `capacity_mw`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        site_type: SiteType,
        capacity_mw: f32,
        seed: u64,
    ) -> Result<Self, SignalError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SignalError::invalid("id", "must not be empty"));
        }
        check_capacity(capacity_mw)?;
        Ok(Self {
            id,
            name: name.into(),
            site_type,
            capacity_mw,
            seed,
        })
    }
}

/// Rejects non-finite or non-positive nameplate capacity.
pub(crate) fn check_capacity(capacity_mw: f32) -> Result<(), SignalError> {
    if !capacity_mw.is_finite() || capacity_mw <= 0.0 {
        return Err(SignalError::invalid(
            "capacity_mw",
            format!("must be a finite value > 0, got {capacity_mw}"),
        ));
    }
    Ok(())
}

/// Raw site entry as it appears in a portfolio file.
///
/// Every field except `name` may be missing on the wire; conversion into a
/// [`SiteDescriptor`] decides what is acceptable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteRecord {
    /// Explicit id; the slug of `name` is used when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    #[serde(default)]
    pub capacity_mw: Option<f32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TryFrom<&SiteRecord> for SiteDescriptor {
    type Error = SignalError;

    fn try_from(record: &SiteRecord) -> Result<Self, Self::Error> {
        let site_type: SiteType = record.site_type.parse()?;
        let capacity_mw = record
            .capacity_mw
            .ok_or_else(|| SignalError::invalid("capacity_mw", "missing"))?;
        let seed = record
            .seed
            .ok_or_else(|| SignalError::invalid("seed", "missing"))?;
        let id = match &record.id {
            Some(id) => id.clone(),
            None => slugify(&record.name),
        };
        SiteDescriptor::new(id, record.name.clone(), site_type, capacity_mw, seed)
    }
}

/// Lowercases a display name and joins words with `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site_type: &str, capacity_mw: Option<f32>, seed: Option<u64>) -> SiteRecord {
        SiteRecord {
            id: None,
            name: "Iceloss Wind".to_string(),
            site_type: site_type.to_string(),
            capacity_mw,
            seed,
        }
    }

    #[test]
    fn site_type_parses_case_insensitively() {
        assert_eq!("Wind".parse::<SiteType>(), Ok(SiteType::Wind));
        assert_eq!("SOLAR".parse::<SiteType>(), Ok(SiteType::Solar));
        assert_eq!("demand".parse::<SiteType>(), Ok(SiteType::Demand));
    }

    #[test]
    fn load_is_an_alias_for_demand() {
        assert_eq!("Load".parse::<SiteType>(), Ok(SiteType::Demand));
    }

    #[test]
    fn unknown_site_type_is_invalid_parameter() {
        let err = "hydro".parse::<SiteType>().unwrap_err();
        assert_eq!(err.field(), "type");
    }

    #[test]
    fn slug_replaces_spaces_and_lowercases() {
        assert_eq!(slugify("Iceloss Wind"), "iceloss-wind");
        assert_eq!(slugify("demand_se3"), "demand_se3");
        assert_eq!(slugify("  Solar   Site "), "solar-site");
    }

    #[test]
    fn record_without_id_uses_slug() {
        let d = SiteDescriptor::try_from(&record("wind", Some(150.0), Some(7))).unwrap();
        assert_eq!(d.id, "iceloss-wind");
        assert_eq!(d.site_type, SiteType::Wind);
        assert_eq!(d.capacity_mw, 150.0);
        assert_eq!(d.seed, 7);
    }

    #[test]
    fn record_without_seed_is_rejected() {
        let err = SiteDescriptor::try_from(&record("wind", Some(150.0), None)).unwrap_err();
        assert_eq!(err.field(), "seed");
    }

    #[test]
    fn record_with_zero_capacity_is_rejected() {
        let err = SiteDescriptor::try_from(&record("solar", Some(0.0), Some(1))).unwrap_err();
        assert_eq!(err.field(), "capacity_mw");
    }

    #[test]
    fn record_without_capacity_is_rejected() {
        let err = SiteDescriptor::try_from(&record("solar", None, Some(1))).unwrap_err();
        assert_eq!(err.field(), "capacity_mw");
    }

    #[test]
    fn nan_capacity_is_rejected() {
        let err = SiteDescriptor::new("a", "A", SiteType::Wind, f32::NAN, 1).unwrap_err();
        assert_eq!(err.field(), "capacity_mw");
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = SiteDescriptor::new(" ", "A", SiteType::Wind, 1.0, 1).unwrap_err();
        assert_eq!(err.field(), "id");
    }
}

//! Series values produced by the generator.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::site::SiteDescriptor;

/// One time-stamped point of a site series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Sample instant, in the offset of the `now` it was generated for.
    pub timestamp: DateTime<FixedOffset>,
    /// Nameplate capacity (MW).
    pub capacity: f32,
    /// Realized value (MW); `None` after `now`.
    pub actual: Option<f32>,
    /// Forecast value (MW) in `[0, capacity]`.
    pub forecast: f32,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | cap={:>9.2} MW  forecast={:>9.2} MW  actual=",
            self.timestamp.format("%Y-%m-%d %H:%M %:z"),
            self.capacity,
            self.forecast,
        )?;
        match self.actual {
            Some(a) => write!(f, "{a:>9.2} MW"),
            None => write!(f, "{:>9}", "-"),
        }
    }
}

/// Ordered samples of one site around a `now` instant.
///
/// Timestamps strictly increase. The generator is the only producer;
/// consumers read it through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSeries {
    site: SiteDescriptor,
    now: DateTime<FixedOffset>,
    step_hours: i64,
    now_index: usize,
    samples: Vec<Sample>,
}

impl SignalSeries {
    pub(crate) fn new(
        site: SiteDescriptor,
        now: DateTime<FixedOffset>,
        step_hours: i64,
        samples: Vec<Sample>,
    ) -> Self {
        let now_index = samples
            .iter()
            .rposition(|s| s.timestamp <= now)
            .unwrap_or(0);
        Self {
            site,
            now,
            step_hours,
            now_index,
            samples,
        }
    }

    pub fn site(&self) -> &SiteDescriptor {
        &self.site
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn step_hours(&self) -> i64 {
        self.step_hours
    }

    /// Index of the reference row: the last sample at or before `now`.
    pub fn now_index(&self) -> usize {
        self.now_index
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples at or before `now` (those carrying an actual value).
    pub fn historical(&self) -> &[Sample] {
        let end = (self.now_index + 1).min(self.samples.len());
        &self.samples[..end]
    }

    /// Samples strictly after `now`.
    pub fn future(&self) -> &[Sample] {
        let start = (self.now_index + 1).min(self.samples.len());
        &self.samples[start..]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::site::SiteType;

    fn series() -> SignalSeries {
        let now = DateTime::parse_from_rfc3339("2024-06-15T12:00:00+00:00").unwrap();
        let site = SiteDescriptor::new("s", "S", SiteType::Wind, 10.0, 1).unwrap();
        let samples = (-2..=2)
            .map(|h| Sample {
                timestamp: now + TimeDelta::hours(h),
                capacity: 10.0,
                actual: (h <= 0).then_some(5.0),
                forecast: 4.0,
            })
            .collect();
        SignalSeries::new(site, now, 1, samples)
    }

    #[test]
    fn now_index_is_last_sample_not_after_now() {
        let s = series();
        assert_eq!(s.now_index(), 2);
        assert_eq!(s.samples()[s.now_index()].timestamp, s.now());
    }

    #[test]
    fn historical_and_future_partition_the_samples() {
        let s = series();
        assert_eq!(s.historical().len(), 3);
        assert_eq!(s.future().len(), 2);
        assert!(s.historical().iter().all(|x| x.actual.is_some()));
        assert!(s.future().iter().all(|x| x.actual.is_none()));
    }

    #[test]
    fn display_marks_missing_actual() {
        let s = series();
        let past = format!("{}", s.samples()[0]);
        let future = format!("{}", s.samples()[4]);
        assert!(past.contains("actual=     5.00 MW"), "{past}");
        assert!(future.ends_with('-'), "{future}");
    }
}

//! Chart-ready view of a series: aligned channels and axis labels.

use serde::Serialize;

use crate::signal::SignalSeries;

/// Three aligned channels plus x-axis labels for a time-series card.
///
/// `actual` is `None` after `now`; `now_index` is where the reference line
/// is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub site_id: String,
    pub site_name: String,
    pub capacity_mw: f32,
    /// Axis labels: date only, with the time added at 00:00 and 12:00.
    pub labels: Vec<String>,
    /// Full `%a %d/%m %H:%M` label per point.
    pub tooltips: Vec<String>,
    pub capacity: Vec<f32>,
    pub actual: Vec<Option<f32>>,
    pub forecast: Vec<f32>,
    pub now_index: usize,
}

impl From<&SignalSeries> for ChartData {
    fn from(series: &SignalSeries) -> Self {
        let n = series.len();
        let mut labels = Vec::with_capacity(n);
        let mut tooltips = Vec::with_capacity(n);
        let mut capacity = Vec::with_capacity(n);
        let mut actual = Vec::with_capacity(n);
        let mut forecast = Vec::with_capacity(n);

        for s in series.samples() {
            let date = s.timestamp.format("%a %d/%m").to_string();
            let time = s.timestamp.format("%H:%M").to_string();
            labels.push(if time == "00:00" || time == "12:00" {
                format!("{date} {time}")
            } else {
                date.clone()
            });
            tooltips.push(format!("{date} {time}"));
            capacity.push(s.capacity);
            actual.push(s.actual);
            forecast.push(s.forecast);
        }

        Self {
            site_id: series.site().id.clone(),
            site_name: series.site().name.clone(),
            capacity_mw: series.site().capacity_mw,
            labels,
            tooltips,
            capacity,
            actual,
            forecast,
            now_index: series.now_index(),
        }
    }
}

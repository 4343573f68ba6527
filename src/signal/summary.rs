//! Post-hoc summary of a generated series.

use std::fmt;

use serde::Serialize;

use super::types::SignalSeries;

/// Aggregate figures derived from a complete series.
///
/// Historical figures use samples at or before `now`; forecast energy uses
/// samples after it.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    /// Site identifier.
    pub site_id: String,
    /// Number of samples in the series.
    pub samples: usize,
    /// Highest actual value (MW).
    pub peak_actual_mw: f32,
    /// Mean actual value (MW).
    pub mean_actual_mw: f32,
    /// Mean actual divided by capacity.
    pub capacity_factor: f32,
    /// Mean absolute historical forecast error (MW).
    pub forecast_mae_mw: f32,
    /// Root-mean-square historical forecast error (MW).
    pub forecast_rmse_mw: f32,
    /// Highest forecast value over the whole series (MW).
    pub peak_forecast_mw: f32,
    /// Forecast energy after `now` (MWh).
    pub future_energy_mwh: f32,
}

impl SeriesSummary {
    pub fn from_series(series: &SignalSeries) -> Self {
        let capacity = series.site().capacity_mw;
        let mut peak_actual = 0.0_f32;
        let mut actual_sum = 0.0_f32;
        let mut abs_sum = 0.0_f32;
        let mut sq_sum = 0.0_f32;
        let mut n_hist = 0_usize;

        for s in series.historical() {
            if let Some(actual) = s.actual {
                let err = s.forecast - actual;
                peak_actual = peak_actual.max(actual);
                actual_sum += actual;
                abs_sum += err.abs();
                sq_sum += err * err;
                n_hist += 1;
            }
        }

        let (mean_actual, mae, rmse) = if n_hist > 0 {
            let n = n_hist as f32;
            (actual_sum / n, abs_sum / n, (sq_sum / n).sqrt())
        } else {
            (0.0, 0.0, 0.0)
        };

        let peak_forecast = series
            .samples()
            .iter()
            .map(|s| s.forecast)
            .fold(0.0_f32, f32::max);
        let step = series.step_hours() as f32;
        let future_energy = series.future().iter().map(|s| s.forecast * step).sum();

        Self {
            site_id: series.site().id.clone(),
            samples: series.len(),
            peak_actual_mw: peak_actual,
            mean_actual_mw: mean_actual,
            capacity_factor: if capacity > 0.0 {
                mean_actual / capacity
            } else {
                0.0
            },
            forecast_mae_mw: mae,
            forecast_rmse_mw: rmse,
            peak_forecast_mw: peak_forecast,
            future_energy_mwh: future_energy,
        }
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.site_id)?;
        writeln!(f, "Samples:               {}", self.samples)?;
        writeln!(f, "Peak actual:           {:.2} MW", self.peak_actual_mw)?;
        writeln!(f, "Mean actual:           {:.2} MW", self.mean_actual_mw)?;
        writeln!(
            f,
            "Capacity factor:       {:.1}%",
            self.capacity_factor * 100.0
        )?;
        writeln!(f, "Forecast MAE:          {:.3} MW", self.forecast_mae_mw)?;
        writeln!(f, "Forecast RMSE:         {:.3} MW", self.forecast_rmse_mw)?;
        writeln!(f, "Peak forecast:         {:.2} MW", self.peak_forecast_mw)?;
        write!(f, "Future energy:         {:.1} MWh", self.future_energy_mwh)
    }
}

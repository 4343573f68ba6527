//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use super::AppState;
use super::error::ApiError;
use super::types::SeriesQuery;
use crate::chart::ChartData;
use crate::signal::SignalSeries;
use crate::site::SiteDescriptor;

/// `GET /sites` → 200 + `Vec<SiteDescriptor>` JSON
pub async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<SiteDescriptor>> {
    Json(state.sites.clone())
}

fn series_for(
    state: &AppState,
    id: &str,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Result<SignalSeries, ApiError> {
    let site = state
        .site(id)
        .ok_or_else(|| ApiError::SiteNotFound(id.to_string()))?;
    let Query(query) = query?;
    let now = query.now()?;
    let window = query.window(state.generator.config().window)?;
    Ok(state.generator.generate_window(site, now, window)?)
}

/// Generates the site's series.
///
/// `GET /sites/{id}/series` → 200 + `SignalSeries` JSON
/// `GET /sites/{id}/series?now=...&future_hours=48` → custom window
/// Unknown site → 404, bad `now` or window → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Result<Json<SignalSeries>, ApiError> {
    series_for(&state, &id, query).map(Json)
}

/// Same as [`get_series`], shaped as [`ChartData`].
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Result<Json<ChartData>, ApiError> {
    let series = series_for(&state, &id, query)?;
    Ok(Json(ChartData::from(&series)))
}

//! Read-only REST API over the site portfolio.
//!
//! Provides three GET endpoints:
//! - `/sites`: the site descriptors
//! - `/sites/{id}/series`: a freshly generated series
//! - `/sites/{id}/chart`: the same series shaped for a chart card

mod error;
mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

pub use error::ApiError;
pub use types::{ErrorResponse, SeriesQuery};

use crate::signal::SignalGenerator;
use crate::site::SiteDescriptor;

/// Immutable application state shared across all request handlers.
///
/// Series are generated per request, so the state never changes and needs
/// no locks.
pub struct AppState {
    /// Generator with the portfolio's tuning.
    pub generator: SignalGenerator,
    /// Sites that can be queried.
    pub sites: Vec<SiteDescriptor>,
}

impl AppState {
    fn site(&self, id: &str) -> Option<&SiteDescriptor> {
        self.sites.iter().find(|s| s.id == id)
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sites", get(handlers::list_sites))
        .route("/sites/{id}/series", get(handlers::get_series))
        .route("/sites/{id}/chart", get(handlers::get_chart))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}

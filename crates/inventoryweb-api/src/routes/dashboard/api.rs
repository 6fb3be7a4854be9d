//! Dashboard API endpoints - JSON API

use crate::AppState;
use axum::Json;
use inventoryweb_core::DashboardState;

/// Current dashboard state
pub async fn api_state(state: axum::extract::State<AppState>) -> Json<DashboardState> {
    Json(state.dashboard.snapshot())
}

/// Run one activation to completion and return the state it settled on
pub async fn api_refresh(state: axum::extract::State<AppState>) -> Json<DashboardState> {
    Json(state.dashboard.activate().await)
}

//! Operational REST handlers.

use crate::build_info::BuildInfo;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

/// Liveness probe.
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build metadata for the running service.
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn get_build_info(Extension(build_info): Extension<BuildInfo>) -> Json<BuildInfo> {
    Json(build_info)
}

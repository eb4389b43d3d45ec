use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::bootstrap::BootstrapReport;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    bootstrap: BootstrapReport,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Ready once startup reconciliation has completed; the router is only built
/// after that, so this always reports the final outcome.
pub async fn readyz(State(report): State<Arc<BootstrapReport>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ready",
            bootstrap: BootstrapReport::clone(&report),
        }),
    )
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Golf Classic API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Back office API for the charity golf classic",
        "endpoints": {
            "health": "/health (public)",
            "tournament": "/api/tournament-years, /api/flights, /api/teams, /api/players (GET public, writes protected)",
            "scoring": "/api/contests, /api/results, /api/contest-results (GET public, writes protected)",
            "sponsors": "/api/sponsors[/:id], /api/sponsor-levels (GET public, writes protected)",
            "upload": "/api/upload (protected, multipart)",
        }
    }))
}

/// GET /health - database round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db().execute("SELECT 1 AS ok", &[]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unavailable",
                    "timestamp": now,
                })),
            )
        }
    }
}

//! Health check endpoint

use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use crate::{response::ApiResponse, state::AppState};

/// Service status and database reachability. Always answers 200.
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<Value> {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(true) => "connected",
        _ => "unavailable",
    };

    ApiResponse::ok(json!({
        "status": "ok",
        "service": "storefront",
        "database": database,
        "timestamp": Utc::now(),
    }))
}

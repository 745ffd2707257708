//! Health check e exposição de métricas

use axum::{Json, extract::State};
use serde::Serialize;
use sfera_adapter_postgres::check_connection;

use crate::api::routes::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Liveness sempre 200; o campo `database` reporta a prontidão do banco
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match check_connection(state.tx.pool()).await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    };

    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        database,
        timestamp: chrono::Utc::now(),
    })
}

/// Texto no formato de exposição do Prometheus
pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

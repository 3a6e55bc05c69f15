use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;

/// Liveness report covering the two sinks the service depends on: the
/// database and the audit log file.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db_ok: bool,
    /// Whether the audit log path currently accepts appends. A false value
    /// means granted actions are running unrecorded.
    pub audit_log_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service liveness and sink checks", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let db_result = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await;
    let db_ok = db_result.is_ok();

    // Same open mode the recorder uses, so this probes the real append path.
    let audit_result = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(state.audit.path());
    let audit_log_ok = audit_result.is_ok();

    let detail = match (db_result.err(), audit_result.err()) {
        (Some(db_err), _) => Some(db_err.to_string()),
        (None, Some(log_err)) => Some(log_err.to_string()),
        (None, None) => None,
    };

    Ok(Json(HealthResponse {
        status: "ok",
        db_ok,
        audit_log_ok,
        detail,
    }))
}

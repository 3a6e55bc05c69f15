use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::app::AppState;
use crate::audit::{AuditEntry, RequestContext, RoleStatistics};
use crate::authz::{AccessPolicy, IdentityContext};
use crate::errors::AppResult;

const DEFAULT_LOG_LIMIT: usize = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditLogQuery {
    /// Filter on the literal role string (e.g. RESPONSABLE).
    pub role: Option<String>,
    /// Filter on the action category (e.g. ACTION_ADMIN).
    pub action: Option<String>,
    /// Most-recent-lines window, applied before the filters.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogsResponse {
    pub logs: Vec<AuditEntry>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/admin/audit/logs",
    tag = "Audit",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Recent audit entries, newest first", body = AuditLogsResponse),
        (status = 403, description = "Access denied")
    )
)]
pub async fn audit_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Json<AuditLogsResponse>> {
    let ctx = RequestContext::from_headers(&headers);
    state
        .gate
        .authorize(&identity, &AccessPolicy::AdminOrResponsable, "audit_logs", &ctx, None)?;

    let logs = state.audit.get_audit_logs(
        query.limit.unwrap_or(DEFAULT_LOG_LIMIT),
        query.role.as_deref().filter(|f| !f.is_empty()),
        query.action.as_deref().filter(|f| !f.is_empty()),
    );
    let count = logs.len();

    Ok(Json(AuditLogsResponse { logs, count }))
}

#[utoipa::path(
    get,
    path = "/admin/audit/stats",
    tag = "Audit",
    responses(
        (status = 200, description = "Role-bucketed activity statistics", body = RoleStatistics),
        (status = 403, description = "Access denied")
    )
)]
pub async fn audit_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
) -> AppResult<Json<RoleStatistics>> {
    let ctx = RequestContext::from_headers(&headers);
    state
        .gate
        .authorize(&identity, &AccessPolicy::AdminOrResponsable, "audit_stats", &ctx, None)?;

    Ok(Json(state.audit.get_role_statistics()))
}

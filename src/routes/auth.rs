use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::IdentityContext;
use crate::errors::{AppError, AppResult};
use crate::models::user::{AuthResponse, DbUser, LoginRequest, User};
use crate::utils::verify_password;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let db_user = fetch_user_by_login(&state.pool, &payload.login)
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

    let password_ok = verify_password(&payload.password, &db_user.password_hash)?;
    if !password_ok {
        return Err(AppError::unauthorized("invalid credentials"));
    }

    let user: User = db_user.try_into()?;

    // Both identity stores are populated here: the session entry and the
    // token that references it.
    let sid = state.sessions.open(user.id, user.role, user.name.clone());
    let token = state.jwt.encode(user.id, sid)?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Current user", body = User))
)]
pub async fn me(State(state): State<AppState>, identity: IdentityContext) -> AppResult<Json<User>> {
    let db_user = fetch_user_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    let user: User = db_user.try_into()?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session closed"))
)]
pub async fn logout(
    State(state): State<AppState>,
    identity: IdentityContext,
) -> AppResult<Json<MessageResponse>> {
    state.sessions.close(identity.session_id);
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

async fn fetch_user_by_login(pool: &SqlitePool, login: &str) -> AppResult<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, name, login, role, password_hash, created_at, updated_at FROM users WHERE login = ?",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

async fn fetch_user_by_id(pool: &SqlitePool, user_id: uuid::Uuid) -> AppResult<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, name, login, role, password_hash, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

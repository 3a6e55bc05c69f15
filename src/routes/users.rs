use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::audit::RequestContext;
use crate::authz::{AccessPolicy, IdentityContext};
use crate::errors::{AppError, AppResult};
use crate::models::user::{DbUser, User, UserCreateRequest};
use crate::utils::hash_password;

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "User listing", body = [User]),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
) -> AppResult<Json<Vec<User>>> {
    let ctx = RequestContext::from_headers(&headers);
    state
        .gate
        .authorize(&identity, &AccessPolicy::AdminOrResponsable, "list_users", &ctx, None)?;

    let rows = sqlx::query_as::<_, DbUser>(
        "SELECT id, name, login, role, password_hash, created_at, updated_at FROM users ORDER BY login",
    )
    .fetch_all(&state.pool)
    .await?;

    let users = rows
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "Admin",
    request_body = UserCreateRequest,
    responses(
        (status = 201, description = "User provisioned", body = User),
        (status = 403, description = "Access denied"),
        (status = 409, description = "Login already in use")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
    Json(payload): Json<UserCreateRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let ctx = RequestContext::from_headers(&headers);
    state.gate.authorize(
        &identity,
        &AccessPolicy::AdminOrResponsable,
        "create_user",
        &ctx,
        Some(&format!("login={} role={}", payload.login, payload.role)),
    )?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE login = ?")
        .bind(&payload.login)
        .fetch_one(&state.pool)
        .await?;
    if count > 0 {
        return Err(AppError::conflict("login already in use"));
    }

    let password_hash = hash_password(&payload.password)?;
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        login: payload.login,
        role: payload.role,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO users (id, name, login, role, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.login)
    .bind(user.role.as_str())
    .bind(password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

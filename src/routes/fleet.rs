use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::audit::RequestContext;
use crate::authz::{AccessPolicy, IdentityContext};
use crate::errors::{AppError, AppResult};
use crate::models::bus::{Bus, BusCreateRequest};

#[utoipa::path(
    get,
    path = "/buses",
    tag = "Fleet",
    responses(
        (status = 200, description = "Fleet listing", body = [Bus]),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_buses(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
) -> AppResult<Json<Vec<Bus>>> {
    let ctx = RequestContext::from_headers(&headers);
    state
        .gate
        .authorize(&identity, &AccessPolicy::SuperviseurAccess, "list_buses", &ctx, None)?;

    let buses = sqlx::query_as::<_, Bus>(
        "SELECT id, numero, etat_vehicule, kilometrage, nombre_places, created_at FROM buses ORDER BY numero",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(buses))
}

#[utoipa::path(
    post,
    path = "/buses",
    tag = "Fleet",
    request_body = BusCreateRequest,
    responses(
        (status = 201, description = "Bus registered", body = Bus),
        (status = 403, description = "Access denied"),
        (status = 409, description = "Fleet number already in use")
    )
)]
pub async fn create_bus(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
    Json(payload): Json<BusCreateRequest>,
) -> AppResult<(StatusCode, Json<Bus>)> {
    let ctx = RequestContext::from_headers(&headers);
    state.gate.authorize(
        &identity,
        &AccessPolicy::AdminOrResponsable,
        "create_bus",
        &ctx,
        Some(&format!("numero={}", payload.numero)),
    )?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM buses WHERE numero = ?")
        .bind(&payload.numero)
        .fetch_one(&state.pool)
        .await?;
    if count > 0 {
        return Err(AppError::conflict("fleet number already in use"));
    }

    let bus = Bus {
        id: Uuid::new_v4(),
        numero: payload.numero,
        etat_vehicule: payload.etat_vehicule,
        kilometrage: payload.kilometrage,
        nombre_places: payload.nombre_places,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO buses (id, numero, etat_vehicule, kilometrage, nombre_places, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(bus.id)
    .bind(&bus.numero)
    .bind(&bus.etat_vehicule)
    .bind(bus.kilometrage)
    .bind(bus.nombre_places)
    .bind(bus.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(bus)))
}

#[utoipa::path(
    delete,
    path = "/buses/{id}",
    tag = "Fleet",
    params(("id" = Uuid, Path, description = "Bus id")),
    responses(
        (status = 204, description = "Bus removed"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Bus not found")
    )
)]
pub async fn delete_bus(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let ctx = RequestContext::from_headers(&headers);
    state.gate.authorize(
        &identity,
        &AccessPolicy::AdminBusinessAction,
        "delete_bus",
        &ctx,
        Some(&format!("bus_id={id}")),
    )?;

    let result = sqlx::query("DELETE FROM buses WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("bus not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::audit::RequestContext;
use crate::authz::{AccessPolicy, IdentityContext, Role};
use crate::errors::AppResult;
use crate::models::trip::{Trip, TripCreateRequest};

/// Trip mutation is open to planners only; SUPERVISEUR stays read-only
/// by policy even if a role list gets edited carelessly.
const TRIP_WRITERS: &[Role] = &[Role::Admin, Role::Responsable, Role::Charge];

#[utoipa::path(
    get,
    path = "/trips",
    tag = "Trips",
    responses(
        (status = 200, description = "Trip listing", body = [Trip]),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
) -> AppResult<Json<Vec<Trip>>> {
    let ctx = RequestContext::from_headers(&headers);
    state
        .gate
        .authorize(&identity, &AccessPolicy::ReadOnly(&Role::ALL), "list_trips", &ctx, None)?;

    let trips = sqlx::query_as::<_, Trip>(
        "SELECT id, point_depart, point_arrivee, date_depart, bus_id, chauffeur_id, created_at FROM trips ORDER BY date_depart DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(trips))
}

#[utoipa::path(
    get,
    path = "/my/trips",
    tag = "Trips",
    responses(
        (status = 200, description = "Trips assigned to the calling driver", body = [Trip]),
        (status = 403, description = "Access denied")
    )
)]
pub async fn my_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
) -> AppResult<Json<Vec<Trip>>> {
    let ctx = RequestContext::from_headers(&headers);
    state.gate.authorize(
        &identity,
        &AccessPolicy::RoleIn(&[Role::Chauffeur]),
        "my_trips",
        &ctx,
        None,
    )?;

    let trips = sqlx::query_as::<_, Trip>(
        "SELECT id, point_depart, point_arrivee, date_depart, bus_id, chauffeur_id, created_at FROM trips WHERE chauffeur_id = ? ORDER BY date_depart DESC",
    )
    .bind(identity.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(trips))
}

#[utoipa::path(
    post,
    path = "/trips",
    tag = "Trips",
    request_body = TripCreateRequest,
    responses(
        (status = 201, description = "Trip planned", body = Trip),
        (status = 403, description = "Access denied")
    )
)]
pub async fn create_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    identity: IdentityContext,
    Json(payload): Json<TripCreateRequest>,
) -> AppResult<(StatusCode, Json<Trip>)> {
    let ctx = RequestContext::from_headers(&headers);
    state.gate.authorize(
        &identity,
        &AccessPolicy::BusinessAction(TRIP_WRITERS),
        "create_trip",
        &ctx,
        None,
    )?;

    let trip = Trip {
        id: Uuid::new_v4(),
        point_depart: payload.point_depart,
        point_arrivee: payload.point_arrivee,
        date_depart: payload.date_depart,
        bus_id: payload.bus_id,
        chauffeur_id: payload.chauffeur_id,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO trips (id, point_depart, point_arrivee, date_depart, bus_id, chauffeur_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(trip.id)
    .bind(&trip.point_depart)
    .bind(&trip.point_arrivee)
    .bind(trip.date_depart)
    .bind(trip.bus_id)
    .bind(trip.chauffeur_id)
    .bind(trip.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(trip)))
}

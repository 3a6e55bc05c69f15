use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::audit::{AuditReader, AuditRecorder};
use crate::authz::DecisionGate;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{audit, auth, fleet, health, trips, users};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
    pub sessions: SessionStore,
    pub gate: Arc<DecisionGate>,
    pub audit: Arc<AuditReader>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig, audit_log: PathBuf) -> Self {
        // Recorder and reader share one path so the write and read sides
        // of the trail can never drift apart.
        let recorder = AuditRecorder::new(audit_log.clone());
        let reader = AuditReader::new(audit_log);

        Self {
            pool,
            jwt: Arc::new(jwt),
            sessions: SessionStore::new(),
            gate: Arc::new(DecisionGate::new(recorder)),
            audit: Arc::new(reader),
        }
    }
}

pub async fn create_app(pool: SqlitePool, audit_log: impl Into<PathBuf>) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(pool, jwt_config, audit_log.into());

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout));

    let fleet_routes = Router::new()
        .route("/", get(fleet::list_buses))
        .route("/", post(fleet::create_bus))
        .route("/:id", delete(fleet::delete_bus));

    let trip_routes = Router::new()
        .route("/", get(trips::list_trips))
        .route("/", post(trips::create_trip));

    let admin_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/audit/logs", get(audit::audit_logs))
        .route("/audit/stats", get(audit::audit_stats));

    let router = Router::new()
        .route("/api/health", get(health::health))
        .nest("/auth", auth_routes)
        .nest("/buses", fleet_routes)
        .nest("/trips", trip_routes)
        .route("/my/trips", get(trips::my_trips))
        .nest("/admin", admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

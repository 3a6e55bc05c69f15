use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::audit::{AuditCategory, AuditEntry, RoleActivity, RoleStatistics};
use crate::authz::Role;
use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::login,
        routes::auth::me,
        routes::auth::logout,
        routes::fleet::list_buses,
        routes::fleet::create_bus,
        routes::fleet::delete_bus,
        routes::trips::list_trips,
        routes::trips::my_trips,
        routes::trips::create_trip,
        routes::users::list_users,
        routes::users::create_user,
        routes::audit::audit_logs,
        routes::audit::audit_stats,
        routes::health::health,
    ),
    components(
        schemas(
            Role,
            AuditCategory,
            AuditEntry,
            RoleActivity,
            RoleStatistics,
            models::user::User,
            models::user::LoginRequest,
            models::user::UserCreateRequest,
            models::user::AuthResponse,
            models::bus::Bus,
            models::bus::BusCreateRequest,
            models::trip::Trip,
            models::trip::TripCreateRequest,
            routes::audit::AuditLogsResponse,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Fleet", description = "Bus fleet management"),
        (name = "Trips", description = "Trip planning"),
        (name = "Admin", description = "User provisioning"),
        (name = "Audit", description = "Audit trail consultation"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn swagger_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Trip {
    pub id: Uuid,
    pub point_depart: String,
    pub point_arrivee: String,
    pub date_depart: DateTime<Utc>,
    pub bus_id: Option<Uuid>,
    pub chauffeur_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TripCreateRequest {
    #[schema(example = "Campus principal")]
    pub point_depart: String,
    #[schema(example = "Centre ville")]
    pub point_arrivee: String,
    pub date_depart: DateTime<Utc>,
    pub bus_id: Option<Uuid>,
    pub chauffeur_id: Option<Uuid>,
}

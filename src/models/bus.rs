use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bus {
    pub id: Uuid,
    /// Fleet number painted on the vehicle, unique.
    pub numero: String,
    /// Vehicle condition, free-form (e.g. "BON", "DEFAILLANT").
    pub etat_vehicule: String,
    pub kilometrage: i64,
    pub nombre_places: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BusCreateRequest {
    #[schema(example = "AED-07")]
    pub numero: String,
    #[schema(example = "BON")]
    pub etat_vehicule: String,
    #[schema(example = 125000)]
    pub kilometrage: i64,
    #[schema(example = 30)]
    pub nombre_places: i64,
}

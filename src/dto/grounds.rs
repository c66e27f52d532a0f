use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateGroundRequest {
    #[serde(alias = "groundName")]
    pub name: String,
    pub location: String,
    pub price_per_slot: Option<i64>,
    pub available_slots: Vec<String>,
    /// Admin only; ground managers always own what they create.
    #[serde(alias = "managerID")]
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateGroundRequest {
    #[serde(alias = "groundName")]
    pub name: Option<String>,
    pub location: Option<String>,
    pub price_per_slot: Option<i64>,
    pub available_slots: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

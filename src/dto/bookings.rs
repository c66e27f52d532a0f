use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(alias = "groundID")]
    pub ground_id: Option<Uuid>,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    pub time_slot: String,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub ground_id: Option<Uuid>,
    pub booking_date: Option<String>,
}

/// Slot catalog of a ground split into booked and free labels for one date.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub ground_id: Uuid,
    pub booking_date: NaiveDate,
    pub all_slots: Vec<String>,
    pub booked_slots: Vec<String>,
    pub available_slots: Vec<String>,
}

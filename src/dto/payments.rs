use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_PAYMENT_METHOD: &str = "Online";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(alias = "bookingID")]
    pub booking_id: Option<Uuid>,
    /// Defaults to `Online`.
    pub payment_method: Option<String>,
}

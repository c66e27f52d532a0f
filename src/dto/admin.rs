use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateRoleRequest {
    /// One of `user`, `groundManager`, `paymentManager`, `admin`.
    pub role: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    pub user: u64,
    pub ground_manager: u64,
    pub payment_manager: u64,
    pub admin: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub by_role: RoleCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroundStats {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub paid: u64,
    pub unpaid: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentStats {
    pub total: u64,
    pub verified: u64,
    pub refunded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SystemStats {
    pub users: UserStats,
    pub grounds: GroundStats,
    pub bookings: BookingStats,
    pub payments: PaymentStats,
}

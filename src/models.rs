use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    bookings::{self, BookingPaymentStatus, BookingStatus},
    grounds,
    payments::{self, PaymentStatus},
    users::{self, Role},
};

/// Account as returned by the API; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&users::Model> for UserSummary {
    fn from(model: &users::Model) -> Self {
        UserSummary {
            id: model.id,
            name: model.name.clone(),
            email: model.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&users::Model> for ManagerSummary {
    fn from(model: &users::Model) -> Self {
        ManagerSummary {
            id: model.id,
            name: model.name.clone(),
            email: model.email.clone(),
            role: model.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ground {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub price_per_slot: i64,
    pub available_slots: Vec<String>,
    pub manager_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerSummary>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ground {
    pub fn with_manager(mut self, manager: Option<&users::Model>) -> Self {
        self.manager = manager.map(ManagerSummary::from);
        self
    }
}

impl From<grounds::Model> for Ground {
    fn from(model: grounds::Model) -> Self {
        Ground {
            id: model.id,
            name: model.name,
            location: model.location,
            price_per_slot: model.price_per_slot,
            available_slots: model.available_slots,
            manager_id: model.manager_id,
            manager: None,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroundSummary {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub price_per_slot: i64,
}

impl From<&grounds::Model> for GroundSummary {
    fn from(model: &grounds::Model) -> Self {
        GroundSummary {
            id: model.id,
            name: model.name.clone(),
            location: model.location.clone(),
            price_per_slot: model.price_per_slot,
        }
    }
}

/// Booking joined with the ground and user it references.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ground_id: Uuid,
    pub user: Option<UserSummary>,
    pub ground: Option<GroundSummary>,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingDetails {
    pub fn from_parts(
        model: bookings::Model,
        user: Option<&users::Model>,
        ground: Option<&grounds::Model>,
    ) -> Self {
        BookingDetails {
            id: model.id,
            user_id: model.user_id,
            ground_id: model.ground_id,
            user: user.map(UserSummary::from),
            ground: ground.map(GroundSummary::from),
            booking_date: model.booking_date,
            time_slot: model.time_slot,
            status: model.status,
            payment_status: model.payment_status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub booking: Option<BookingDetails>,
    pub amount: i64,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
    pub verified_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentDetails {
    pub fn from_parts(
        model: payments::Model,
        booking: Option<BookingDetails>,
        verifier: Option<&users::Model>,
    ) -> Self {
        PaymentDetails {
            id: model.id,
            booking_id: model.booking_id,
            booking,
            amount: model.amount,
            payment_method: model.payment_method,
            transaction_id: model.transaction_id,
            payment_status: model.payment_status,
            verified_by: verifier.map(UserSummary::from),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::bookings::{AvailabilityQuery, CreateBookingRequest, SlotAvailability},
    entity::{
        bookings::{
            ActiveModel as BookingActive, BookingPaymentStatus, BookingStatus,
            Column as BookingCol, Entity as Bookings, Model as BookingModel,
        },
        grounds::Entity as Grounds,
        users::Role,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, authorize, ensure_admin, ensure_ground_access},
    models::BookingDetails,
    response::ApiResponse,
    services::lookup::hydrate_bookings,
    state::AppState,
    validation::parse_booking_date,
};

const SLOT_TAKEN: &str = "This time slot is already booked";

/// Split `catalog` into (booked, available), both in catalog order.
///
/// Labels in `taken` that are no longer part of the catalog are ignored, so
/// the two halves always partition the catalog exactly.
pub fn partition_slots(catalog: &[String], taken: &[String]) -> (Vec<String>, Vec<String>) {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    catalog
        .iter()
        .cloned()
        .partition(|slot| taken.contains(slot.as_str()))
}

fn slot_condition(ground_id: Uuid, date: NaiveDate) -> Condition {
    Condition::all()
        .add(BookingCol::GroundId.eq(ground_id))
        .add(BookingCol::BookingDate.eq(date))
        .add(BookingCol::Status.is_in(BookingStatus::ACTIVE))
}

pub async fn check_availability(
    state: &AppState,
    query: AvailabilityQuery,
) -> AppResult<ApiResponse<SlotAvailability>> {
    let (ground_id, raw_date) = match (query.ground_id, query.booking_date) {
        (Some(id), Some(date)) if !date.trim().is_empty() => (id, date),
        _ => {
            return Err(AppError::BadRequest(
                "Please provide groundId and bookingDate".into(),
            ));
        }
    };
    let booking_date = parse_booking_date(&raw_date)?;

    let ground = Grounds::find_by_id(ground_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))?;

    let taken: Vec<String> = Bookings::find()
        .filter(slot_condition(ground_id, booking_date))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|b| b.time_slot)
        .collect();

    let (booked_slots, available_slots) = partition_slots(&ground.available_slots, &taken);

    Ok(ApiResponse::success(
        "Availability",
        SlotAvailability {
            ground_id,
            booking_date,
            all_slots: ground.available_slots,
            booked_slots,
            available_slots,
        },
    ))
}

/// Reserve one slot of one ground on one date for the caller.
///
/// The ground row is locked for the duration of the check and insert, and the
/// partial unique index on live bookings backs the check up: whichever way a
/// race is lost, the loser sees `Conflict`.
pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<BookingDetails>> {
    let CreateBookingRequest {
        ground_id,
        booking_date,
        time_slot,
    } = payload;
    let ground_id = match ground_id {
        Some(id) if !booking_date.trim().is_empty() && !time_slot.is_empty() => id,
        _ => {
            return Err(AppError::BadRequest(
                "Please provide groundId, bookingDate, and timeSlot".into(),
            ));
        }
    };
    let booking_date = parse_booking_date(&booking_date)?;

    let txn = state.orm.begin().await?;

    let ground = Grounds::find_by_id(ground_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))?;

    if !ground.is_active {
        return Err(AppError::InvalidState("Ground is not active".into()));
    }
    if !ground.offers_slot(&time_slot) {
        return Err(AppError::BadRequest(
            "Time slot is not available for this ground".into(),
        ));
    }

    let existing = Bookings::find()
        .filter(slot_condition(ground_id, booking_date).add(BookingCol::TimeSlot.eq(time_slot.as_str())))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(SLOT_TAKEN.into()));
    }

    let booking = BookingActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        ground_id: Set(ground_id),
        booking_date: Set(booking_date),
        time_slot: Set(time_slot),
        status: Set(BookingStatus::Pending),
        payment_status: Set(BookingPaymentStatus::Unpaid),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, SLOT_TAKEN))?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "booking_create",
        "bookings",
        serde_json::json!({
            "booking_id": booking.id,
            "ground_id": booking.ground_id,
            "booking_date": booking.booking_date,
            "time_slot": booking.time_slot,
        }),
    )
    .await;
    tracing::info!(
        booking_id = %booking.id,
        ground_id = %booking.ground_id,
        slot = %booking.time_slot,
        actor = %user.user_id,
        "booking created"
    );

    Ok(ApiResponse::success(
        "Booking created",
        hydrate_one(state, booking).await?,
    ))
}

pub async fn approve_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<BookingDetails>> {
    set_booking_status(state, user, id, BookingStatus::Approved).await
}

pub async fn reject_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<BookingDetails>> {
    set_booking_status(state, user, id, BookingStatus::Rejected).await
}

/// Transitions are not restricted to `Pending` bookings. Moving a rejected
/// booking back to `Approved` only fails if its slot has been taken since.
async fn set_booking_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: BookingStatus,
) -> AppResult<ApiResponse<BookingDetails>> {
    authorize(user, &[Role::GroundManager, Role::Admin])?;

    let txn = state.orm.begin().await?;
    let booking = Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;

    let ground = Grounds::find_by_id(booking.ground_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))?;
    ensure_ground_access(user, &ground)?;

    let previous = booking.status;
    let mut active: BookingActive = booking.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let booking = active
        .update(&txn)
        .await
        .map_err(|err| AppError::conflict_on_unique(err, SLOT_TAKEN))?;

    txn.commit().await?;

    let action = match status {
        BookingStatus::Approved => "booking_approve",
        BookingStatus::Rejected => "booking_reject",
        BookingStatus::Pending => "booking_reset",
    };
    audit::record(
        state,
        user.user_id,
        action,
        "bookings",
        serde_json::json!({ "booking_id": booking.id, "from": previous, "to": status }),
    )
    .await;
    tracing::info!(
        booking_id = %booking.id,
        from = ?previous,
        to = ?status,
        actor = %user.user_id,
        "booking status changed"
    );

    let message = match status {
        BookingStatus::Approved => "Booking approved",
        BookingStatus::Rejected => "Booking rejected",
        BookingStatus::Pending => "Booking updated",
    };
    Ok(ApiResponse::success(message, hydrate_one(state, booking).await?))
}

pub async fn list_user_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<BookingDetails>>> {
    let bookings = Bookings::find()
        .filter(BookingCol::UserId.eq(user.user_id))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let items = hydrate_bookings(&state.orm, bookings).await?;
    Ok(ApiResponse::list("Bookings", items))
}

pub async fn list_ground_bookings(
    state: &AppState,
    user: &AuthUser,
    ground_id: Uuid,
) -> AppResult<ApiResponse<Vec<BookingDetails>>> {
    authorize(user, &[Role::GroundManager, Role::Admin])?;
    let ground = Grounds::find_by_id(ground_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))?;
    ensure_ground_access(user, &ground)?;

    let bookings = Bookings::find()
        .filter(BookingCol::GroundId.eq(ground_id))
        .order_by_asc(BookingCol::BookingDate)
        .order_by_asc(BookingCol::TimeSlot)
        .all(&state.orm)
        .await?;
    let items = hydrate_bookings(&state.orm, bookings).await?;
    Ok(ApiResponse::list("Ground bookings", items))
}

pub async fn list_all_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<BookingDetails>>> {
    ensure_admin(user)?;
    let bookings = Bookings::find()
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let items = hydrate_bookings(&state.orm, bookings).await?;
    Ok(ApiResponse::list("All bookings", items))
}

async fn hydrate_one(state: &AppState, booking: BookingModel) -> AppResult<BookingDetails> {
    hydrate_bookings(&state.orm, vec![booking])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("booking vanished while loading")))
}

#[cfg(test)]
mod tests {
    use super::partition_slots;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn booked_and_available_partition_the_catalog() {
        let catalog = labels(&["06:00-07:00", "07:00-08:00", "09:00-10:00", "18:00-19:00"]);
        let taken = labels(&["09:00-10:00", "06:00-07:00"]);

        let (booked, available) = partition_slots(&catalog, &taken);

        assert_eq!(booked, labels(&["06:00-07:00", "09:00-10:00"]));
        assert_eq!(available, labels(&["07:00-08:00", "18:00-19:00"]));
        assert!(booked.iter().all(|s| !available.contains(s)));
        let mut union = [booked, available].concat();
        union.sort();
        let mut expected = catalog.clone();
        expected.sort();
        assert_eq!(union, expected);
    }

    #[test]
    fn taken_labels_outside_the_catalog_are_ignored() {
        let catalog = labels(&["09:00-10:00"]);
        let taken = labels(&["20:00-21:00"]);

        let (booked, available) = partition_slots(&catalog, &taken);

        assert!(booked.is_empty());
        assert_eq!(available, catalog);
    }

    #[test]
    fn empty_catalog_has_nothing_to_offer() {
        let (booked, available) = partition_slots(&[], &labels(&["09:00-10:00"]));
        assert!(booked.is_empty());
        assert!(available.is_empty());
    }
}

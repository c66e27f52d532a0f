use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::payments::{CreatePaymentRequest, DEFAULT_PAYMENT_METHOD},
    entity::{
        bookings::{
            ActiveModel as BookingActive, BookingPaymentStatus, Column as BookingCol,
            Entity as Bookings,
        },
        grounds::Entity as Grounds,
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel, PaymentStatus,
        },
        users::Role,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, authorize},
    models::PaymentDetails,
    response::ApiResponse,
    services::lookup::{hydrate_bookings, users_by_id},
    state::AppState,
    validation::sanitize_text,
};

const PAYMENT_EXISTS: &str = "Payment already exists for this booking";
const LEDGER_ROLES: [Role; 2] = [Role::PaymentManager, Role::Admin];

/// `TXN` + unix millis + nine uppercase alphanumerics.
pub fn generate_transaction_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect::<String>()
        .to_uppercase();
    format!("TXN{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Record a simulated payment for one of the caller's bookings and mark the
/// booking paid. There is no gateway: the payment always succeeds.
pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<PaymentDetails>> {
    let booking_id = payload
        .booking_id
        .ok_or_else(|| AppError::BadRequest("Please provide bookingId".into()))?;
    let payment_method = payload
        .payment_method
        .map(|m| sanitize_text(&m))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(booking_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;

    if booking.user_id != user.user_id {
        return Err(AppError::forbidden(
            "Not authorized to pay for this booking",
        ));
    }

    let existing = Payments::find()
        .filter(PaymentCol::BookingId.eq(booking.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(PAYMENT_EXISTS.into()));
    }

    let ground = Grounds::find_by_id(booking.ground_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))?;

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        amount: Set(ground.price_per_slot),
        payment_method: Set(payment_method),
        transaction_id: Set(generate_transaction_id()),
        payment_status: Set(PaymentStatus::Success),
        verified_by: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, PAYMENT_EXISTS))?;

    let mut booking: BookingActive = booking.into();
    booking.payment_status = Set(BookingPaymentStatus::Paid);
    booking.updated_at = Set(Utc::now().into());
    booking.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "payment_create",
        "payments",
        serde_json::json!({
            "payment_id": payment.id,
            "booking_id": payment.booking_id,
            "amount": payment.amount,
            "transaction_id": payment.transaction_id,
        }),
    )
    .await;
    tracing::info!(
        payment_id = %payment.id,
        booking_id = %payment.booking_id,
        amount = payment.amount,
        actor = %user.user_id,
        "payment recorded"
    );

    Ok(ApiResponse::success(
        "Payment successful",
        hydrate_one(&state.orm, payment).await?,
    ))
}

pub async fn list_user_payments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<PaymentDetails>>> {
    let booking_ids: Vec<Uuid> = Bookings::find()
        .filter(BookingCol::UserId.eq(user.user_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    let payments = if booking_ids.is_empty() {
        Vec::new()
    } else {
        Payments::find()
            .filter(PaymentCol::BookingId.is_in(booking_ids))
            .order_by_desc(PaymentCol::CreatedAt)
            .all(&state.orm)
            .await?
    };

    let items = hydrate_payments(&state.orm, payments).await?;
    Ok(ApiResponse::list("Payments", items))
}

pub async fn list_all_payments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<PaymentDetails>>> {
    authorize(user, &LEDGER_ROLES)?;
    let payments = Payments::find()
        .order_by_desc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let items = hydrate_payments(&state.orm, payments).await?;
    Ok(ApiResponse::list("All payments", items))
}

/// Annotate a successful payment with the verifier. Status is unchanged.
pub async fn verify_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentDetails>> {
    authorize(user, &LEDGER_ROLES)?;

    let txn = state.orm.begin().await?;

    // Locked so a concurrent refund either lands first and is seen here, or waits.
    let payment = Payments::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Payment"))?;

    if payment.payment_status != PaymentStatus::Success {
        return Err(AppError::InvalidState(
            "Only successful payments can be verified".into(),
        ));
    }

    let mut active: PaymentActive = payment.into();
    active.verified_by = Set(Some(user.user_id));
    active.updated_at = Set(Utc::now().into());
    let payment = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "payment_verify",
        "payments",
        serde_json::json!({ "payment_id": payment.id }),
    )
    .await;
    tracing::info!(payment_id = %payment.id, actor = %user.user_id, "payment verified");

    Ok(ApiResponse::success(
        "Payment verified",
        hydrate_one(&state.orm, payment).await?,
    ))
}

/// Mark the payment refunded and the booking unpaid in one transaction.
pub async fn refund_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentDetails>> {
    authorize(user, &LEDGER_ROLES)?;

    let txn = state.orm.begin().await?;

    let payment = Payments::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Payment"))?;

    if payment.payment_status == PaymentStatus::Refunded {
        return Err(AppError::InvalidState("Payment already refunded".into()));
    }

    let booking = Bookings::find_by_id(payment.booking_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;

    let mut active: PaymentActive = payment.into();
    active.payment_status = Set(PaymentStatus::Refunded);
    active.verified_by = Set(Some(user.user_id));
    active.updated_at = Set(Utc::now().into());
    let payment = active.update(&txn).await?;

    let mut booking: BookingActive = booking.into();
    booking.payment_status = Set(BookingPaymentStatus::Unpaid);
    booking.updated_at = Set(Utc::now().into());
    booking.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "payment_refund",
        "payments",
        serde_json::json!({ "payment_id": payment.id, "booking_id": payment.booking_id }),
    )
    .await;
    tracing::info!(
        payment_id = %payment.id,
        booking_id = %payment.booking_id,
        actor = %user.user_id,
        "payment refunded"
    );

    Ok(ApiResponse::success(
        "Payment refunded",
        hydrate_one(&state.orm, payment).await?,
    ))
}

async fn hydrate_payments<C: ConnectionTrait>(
    conn: &C,
    payments: Vec<PaymentModel>,
) -> AppResult<Vec<PaymentDetails>> {
    let booking_ids: Vec<Uuid> = payments.iter().map(|p| p.booking_id).collect();
    let bookings = if booking_ids.is_empty() {
        Vec::new()
    } else {
        Bookings::find()
            .filter(BookingCol::Id.is_in(booking_ids))
            .all(conn)
            .await?
    };
    let mut bookings = hydrate_bookings(conn, bookings).await?;
    let verifiers = users_by_id(conn, payments.iter().filter_map(|p| p.verified_by)).await?;

    Ok(payments
        .into_iter()
        .map(|p| {
            let booking = bookings
                .iter()
                .position(|b| b.id == p.booking_id)
                .map(|idx| bookings.swap_remove(idx));
            let verifier = p.verified_by.and_then(|v| verifiers.get(&v));
            PaymentDetails::from_parts(p, booking, verifier)
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    payment: PaymentModel,
) -> AppResult<PaymentDetails> {
    hydrate_payments(conn, vec![payment])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("payment vanished while loading")))
}

use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::admin::{
        BookingStats, GroundStats, PaymentStats, RoleCounts, SystemStats, UpdateRoleRequest,
        UserStats,
    },
    entity::{
        bookings::{BookingPaymentStatus, BookingStatus, Column as BookingCol, Entity as Bookings},
        grounds::{Column as GroundCol, Entity as Grounds},
        payments::{Column as PaymentCol, Entity as Payments, PaymentStatus},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Role},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::ApiResponse,
    state::AppState,
};

const USER_IN_USE: &str = "User still has grounds or bookings and cannot be deleted";

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<User>>> {
    ensure_admin(user)?;
    let items = Users::find()
        .order_by_desc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();
    Ok(ApiResponse::list("Users", items))
}

pub async fn update_user_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    if payload.role.trim().is_empty() {
        return Err(AppError::BadRequest("Please provide a role".into()));
    }
    let role = Role::parse(payload.role.trim())
        .ok_or_else(|| AppError::BadRequest("Invalid role".into()))?;

    if id == user.user_id && role != Role::Admin {
        return Err(AppError::BadRequest(
            "You cannot change your own role from admin".into(),
        ));
    }

    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    let previous = existing.role;

    let mut active: UserActive = existing.into();
    active.role = Set(role);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "user_role_update",
        "users",
        serde_json::json!({ "user_id": updated.id, "from": previous, "to": role }),
    )
    .await;
    tracing::info!(user_id = %updated.id, role = role.as_str(), actor = %user.user_id, "role changed");

    Ok(ApiResponse::success("User role updated", User::from(updated)))
}

/// Hard delete. Accounts still referenced by grounds or bookings are kept.
pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    // The row lock makes new grounds or bookings for this user wait until we are done.
    let existing = Users::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    if existing.is_none() {
        return Err(AppError::not_found("User"));
    }

    let owned_grounds = Grounds::find()
        .filter(GroundCol::ManagerId.eq(id))
        .count(&txn)
        .await?;
    let bookings = Bookings::find()
        .filter(BookingCol::UserId.eq(id))
        .count(&txn)
        .await?;
    if owned_grounds > 0 || bookings > 0 {
        return Err(AppError::Conflict(USER_IN_USE.into()));
    }

    Users::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|err| AppError::conflict_on_reference(err, USER_IN_USE))?;

    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User deleted successfully",
        serde_json::json!({ "id": id }),
    ))
}

pub async fn system_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SystemStats>> {
    ensure_admin(user)?;
    let db = &state.orm;

    let role_rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
            .fetch_all(&state.pool)
            .await?;
    let by_role = tally_roles(&role_rows);
    let total_users = role_rows.iter().map(|(_, n)| *n as u64).sum();

    let grounds = Grounds::find()
        .filter(GroundCol::IsActive.eq(true))
        .count(db)
        .await?;

    let bookings = BookingStats {
        total: Bookings::find().count(db).await?,
        pending: Bookings::find()
            .filter(BookingCol::Status.eq(BookingStatus::Pending))
            .count(db)
            .await?,
        approved: Bookings::find()
            .filter(BookingCol::Status.eq(BookingStatus::Approved))
            .count(db)
            .await?,
        rejected: Bookings::find()
            .filter(BookingCol::Status.eq(BookingStatus::Rejected))
            .count(db)
            .await?,
        paid: Bookings::find()
            .filter(BookingCol::PaymentStatus.eq(BookingPaymentStatus::Paid))
            .count(db)
            .await?,
        unpaid: Bookings::find()
            .filter(BookingCol::PaymentStatus.eq(BookingPaymentStatus::Unpaid))
            .count(db)
            .await?,
    };

    let payments = PaymentStats {
        total: Payments::find().count(db).await?,
        verified: Payments::find()
            .filter(PaymentCol::PaymentStatus.eq(PaymentStatus::Success))
            .filter(PaymentCol::VerifiedBy.is_not_null())
            .count(db)
            .await?,
        refunded: Payments::find()
            .filter(PaymentCol::PaymentStatus.eq(PaymentStatus::Refunded))
            .count(db)
            .await?,
    };

    let stats = SystemStats {
        users: UserStats {
            total: total_users,
            by_role,
        },
        grounds: GroundStats { total: grounds },
        bookings,
        payments,
    };
    Ok(ApiResponse::success("System stats", stats))
}

/// Fold `(role, count)` rows into per-role totals; unknown roles are skipped.
pub fn tally_roles(rows: &[(String, i64)]) -> RoleCounts {
    let mut counts = RoleCounts::default();
    for (role, n) in rows {
        let n = (*n).max(0) as u64;
        match Role::parse(role) {
            Some(Role::User) => counts.user += n,
            Some(Role::GroundManager) => counts.ground_manager += n,
            Some(Role::PaymentManager) => counts.payment_manager += n,
            Some(Role::Admin) => counts.admin += n,
            None => tracing::warn!(role = %role, "unknown role in users table"),
        }
    }
    counts
}

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::grounds::{CreateGroundRequest, UpdateGroundRequest},
    entity::{
        grounds::{ActiveModel as GroundActive, Column as GroundCol, Entity as Grounds, Model as GroundModel},
        users::{Entity as Users, Role},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, authorize, ensure_ground_access},
    models::Ground,
    response::ApiResponse,
    services::lookup::users_by_id,
    state::AppState,
    validation::{normalize_slots, sanitize_text},
};

const MANAGE_ROLES: [Role; 2] = [Role::Admin, Role::GroundManager];

pub async fn list_active_grounds(state: &AppState) -> AppResult<ApiResponse<Vec<Ground>>> {
    let grounds = Grounds::find()
        .filter(GroundCol::IsActive.eq(true))
        .order_by_desc(GroundCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let managers = users_by_id(&state.orm, grounds.iter().map(|g| g.manager_id)).await?;
    let items = grounds
        .into_iter()
        .map(|g| {
            let manager = managers.get(&g.manager_id);
            Ground::from(g).with_manager(manager)
        })
        .collect();

    Ok(ApiResponse::list("Grounds", items))
}

/// Fetch by id regardless of the active flag, so bookings can still resolve
/// deactivated grounds.
pub async fn get_ground(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Ground>> {
    let ground = find_ground(state, id).await?;
    let manager = Users::find_by_id(ground.manager_id).one(&state.orm).await?;
    Ok(ApiResponse::success(
        "Ground",
        Ground::from(ground).with_manager(manager.as_ref()),
    ))
}

pub async fn list_my_grounds(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Ground>>> {
    authorize(user, &[Role::GroundManager])?;
    let items = Grounds::find()
        .filter(GroundCol::ManagerId.eq(user.user_id))
        .order_by_desc(GroundCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ground::from)
        .collect();
    Ok(ApiResponse::list("My grounds", items))
}

pub async fn create_ground(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGroundRequest,
) -> AppResult<ApiResponse<Ground>> {
    authorize(user, &MANAGE_ROLES)?;

    let name = sanitize_text(&payload.name);
    let location = sanitize_text(&payload.location);
    let price = payload.price_per_slot.unwrap_or(0);
    if name.is_empty() || location.is_empty() || price <= 0 {
        return Err(AppError::BadRequest(
            "Ground name, location and price per slot are required".into(),
        ));
    }

    let manager_id = match (user.role, payload.manager_id) {
        (Role::Admin, Some(id)) => {
            Users::find_by_id(id)
                .one(&state.orm)
                .await?
                .ok_or_else(|| AppError::not_found("Manager"))?
                .id
        }
        _ => user.user_id,
    };

    let ground = GroundActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        location: Set(location),
        price_per_slot: Set(price),
        available_slots: Set(normalize_slots(payload.available_slots)),
        manager_id: Set(manager_id),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "ground_create",
        "grounds",
        serde_json::json!({ "ground_id": ground.id, "manager_id": manager_id }),
    )
    .await;
    tracing::info!(ground_id = %ground.id, actor = %user.user_id, "ground created");

    Ok(ApiResponse::success("Ground created", Ground::from(ground)))
}

pub async fn update_ground(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateGroundRequest,
) -> AppResult<ApiResponse<Ground>> {
    authorize(user, &MANAGE_ROLES)?;
    let existing = find_ground(state, id).await?;
    ensure_ground_access(user, &existing)?;

    let mut active: GroundActive = existing.into();
    if let Some(name) = payload.name {
        let name = sanitize_text(&name);
        if name.is_empty() {
            return Err(AppError::BadRequest("Ground name cannot be empty".into()));
        }
        active.name = Set(name);
    }
    if let Some(location) = payload.location {
        let location = sanitize_text(&location);
        if location.is_empty() {
            return Err(AppError::BadRequest("Location cannot be empty".into()));
        }
        active.location = Set(location);
    }
    if let Some(price) = payload.price_per_slot {
        if price <= 0 {
            return Err(AppError::BadRequest(
                "Price per slot must be positive".into(),
            ));
        }
        active.price_per_slot = Set(price);
    }
    if let Some(slots) = payload.available_slots {
        active.available_slots = Set(normalize_slots(slots));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let ground = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "ground_update",
        "grounds",
        serde_json::json!({ "ground_id": ground.id }),
    )
    .await;

    Ok(ApiResponse::success("Ground updated", Ground::from(ground)))
}

/// Soft delete: the row stays so existing bookings keep their reference.
pub async fn deactivate_ground(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Ground>> {
    authorize(user, &MANAGE_ROLES)?;
    let existing = find_ground(state, id).await?;
    ensure_ground_access(user, &existing)?;

    let mut active: GroundActive = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().into());
    let ground = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "ground_deactivate",
        "grounds",
        serde_json::json!({ "ground_id": ground.id }),
    )
    .await;
    tracing::info!(ground_id = %ground.id, actor = %user.user_id, "ground deactivated");

    Ok(ApiResponse::success(
        "Ground deactivated successfully",
        Ground::from(ground),
    ))
}

async fn find_ground(state: &AppState, id: Uuid) -> AppResult<GroundModel> {
    Grounds::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Ground"))
}

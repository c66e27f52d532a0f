use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::grounds::{CreateGroundRequest, UpdateGroundRequest},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::Ground,
    response::ApiResponse,
    services::ground_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grounds).post(create_ground))
        .route("/manager/my-grounds", get(my_grounds))
        .route(
            "/{id}",
            get(get_ground).put(update_ground).delete(delete_ground),
        )
}

#[utoipa::path(
    get,
    path = "/api/grounds",
    responses(
        (status = 200, description = "List active grounds", body = ApiResponse<Vec<Ground>>)
    ),
    tag = "Grounds"
)]
pub async fn list_grounds(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Ground>>>> {
    let resp = ground_service::list_active_grounds(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/grounds/{id}",
    params(
        ("id" = Uuid, Path, description = "Ground ID")
    ),
    responses(
        (status = 200, description = "Get ground", body = ApiResponse<Ground>),
        (status = 404, description = "Ground not found"),
    ),
    tag = "Grounds"
)]
pub async fn get_ground(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Ground>>> {
    let resp = ground_service::get_ground(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/grounds/manager/my-grounds",
    responses(
        (status = 200, description = "Grounds owned by the caller", body = ApiResponse<Vec<Ground>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Grounds"
)]
pub async fn my_grounds(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Ground>>>> {
    let resp = ground_service::list_my_grounds(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/grounds",
    request_body = CreateGroundRequest,
    responses(
        (status = 201, description = "Create ground", body = ApiResponse<Ground>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Grounds"
)]
pub async fn create_ground(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateGroundRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Ground>>)> {
    let resp = ground_service::create_ground(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/grounds/{id}",
    params(
        ("id" = Uuid, Path, description = "Ground ID")
    ),
    request_body = UpdateGroundRequest,
    responses(
        (status = 200, description = "Update ground", body = ApiResponse<Ground>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Ground not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Grounds"
)]
pub async fn update_ground(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateGroundRequest>,
) -> AppResult<Json<ApiResponse<Ground>>> {
    let resp = ground_service::update_ground(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/grounds/{id}",
    params(
        ("id" = Uuid, Path, description = "Ground ID")
    ),
    responses(
        (status = 200, description = "Deactivate ground", body = ApiResponse<Ground>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Ground not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Grounds"
)]
pub async fn delete_ground(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Ground>>> {
    let resp = ground_service::deactivate_ground(&state, &user, id).await?;
    Ok(Json(resp))
}

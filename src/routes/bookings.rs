use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::bookings::{AvailabilityQuery, CreateBookingRequest, SlotAvailability},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::BookingDetails,
    response::ApiResponse,
    services::booking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_bookings).post(create_booking))
        .route("/availability", get(availability))
        .route("/user", get(my_bookings))
        .route("/ground/{ground_id}", get(ground_bookings))
        .route("/{id}/approve", put(approve_booking))
        .route("/{id}/reject", put(reject_booking))
}

#[utoipa::path(
    get,
    path = "/api/bookings/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slot availability for a ground and date", body = ApiResponse<SlotAvailability>),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 404, description = "Ground not found"),
    ),
    tag = "Bookings"
)]
pub async fn availability(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<SlotAvailability>>> {
    let resp = booking_service::check_availability(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Create booking", body = ApiResponse<BookingDetails>),
        (status = 400, description = "Invalid input, inactive ground or slot already booked"),
        (status = 404, description = "Ground not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookingDetails>>)> {
    let resp = booking_service::create_booking(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/bookings/user",
    responses(
        (status = 200, description = "Caller's bookings", body = ApiResponse<Vec<BookingDetails>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<BookingDetails>>>> {
    let resp = booking_service::list_user_bookings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/bookings/ground/{ground_id}",
    params(
        ("ground_id" = Uuid, Path, description = "Ground ID")
    ),
    responses(
        (status = 200, description = "Bookings of one ground", body = ApiResponse<Vec<BookingDetails>>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Ground not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn ground_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(ground_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<BookingDetails>>>> {
    let resp = booking_service::list_ground_bookings(&state, &user, ground_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "All bookings (admin only)", body = ApiResponse<Vec<BookingDetails>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn list_all_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<BookingDetails>>>> {
    let resp = booking_service::list_all_bookings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Approve booking", body = ApiResponse<BookingDetails>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetails>>> {
    let resp = booking_service::approve_booking(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Reject booking", body = ApiResponse<BookingDetails>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn reject_booking(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetails>>> {
    let resp = booking_service::reject_booking(&state, &user, id).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::payments::CreatePaymentRequest,
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::PaymentDetails,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_payments).post(create_payment))
        .route("/user", get(my_payments))
        .route("/{id}/verify", put(verify_payment))
        .route("/{id}/refund", put(refund_payment))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Pay for own booking", body = ApiResponse<PaymentDetails>),
        (status = 400, description = "Payment already exists"),
        (status = 403, description = "Booking belongs to someone else"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentDetails>>)> {
    let resp = payment_service::create_payment(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/payments/user",
    responses(
        (status = 200, description = "Caller's payments", body = ApiResponse<Vec<PaymentDetails>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn my_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<PaymentDetails>>>> {
    let resp = payment_service::list_user_payments(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "All payments", body = ApiResponse<Vec<PaymentDetails>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_all_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<PaymentDetails>>>> {
    let resp = payment_service::list_all_payments(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}/verify",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Verify payment", body = ApiResponse<PaymentDetails>),
        (status = 400, description = "Payment is not successful"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentDetails>>> {
    let resp = payment_service::verify_payment(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}/refund",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Refund payment", body = ApiResponse<PaymentDetails>),
        (status = 400, description = "Payment already refunded"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentDetails>>> {
    let resp = payment_service::refund_payment(&state, &user, id).await?;
    Ok(Json(resp))
}

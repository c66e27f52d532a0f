use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod doc;
pub mod grounds;
pub mod health;
pub mod payments;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/grounds", grounds::router())
        .nest("/bookings", bookings::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}

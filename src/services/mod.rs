pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod ground_service;
pub mod lookup;
pub mod payment_service;

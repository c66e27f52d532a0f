use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            BookingStats, GroundStats, PaymentStats, RoleCounts, SystemStats, UpdateRoleRequest,
            UserStats,
        },
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        bookings::{AvailabilityQuery, CreateBookingRequest, SlotAvailability},
        grounds::{CreateGroundRequest, UpdateGroundRequest},
        payments::CreatePaymentRequest,
    },
    entity::{
        bookings::{BookingPaymentStatus, BookingStatus},
        payments::PaymentStatus,
        users::Role,
    },
    models::{
        BookingDetails, Ground, GroundSummary, ManagerSummary, PaymentDetails, User, UserSummary,
    },
    response::ApiResponse,
    routes::{admin, auth, bookings, grounds, health, payments},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        grounds::list_grounds,
        grounds::get_ground,
        grounds::my_grounds,
        grounds::create_ground,
        grounds::update_ground,
        grounds::delete_ground,
        bookings::availability,
        bookings::create_booking,
        bookings::my_bookings,
        bookings::ground_bookings,
        bookings::list_all_bookings,
        bookings::approve_booking,
        bookings::reject_booking,
        payments::create_payment,
        payments::my_payments,
        payments::list_all_payments,
        payments::verify_payment,
        payments::refund_payment,
        admin::list_users,
        admin::update_user_role,
        admin::delete_user,
        admin::system_stats
    ),
    components(
        schemas(
            Role,
            BookingStatus,
            BookingPaymentStatus,
            PaymentStatus,
            User,
            UserSummary,
            ManagerSummary,
            Ground,
            GroundSummary,
            BookingDetails,
            PaymentDetails,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CreateGroundRequest,
            UpdateGroundRequest,
            CreateBookingRequest,
            AvailabilityQuery,
            SlotAvailability,
            CreatePaymentRequest,
            UpdateRoleRequest,
            RoleCounts,
            UserStats,
            GroundStats,
            BookingStats,
            PaymentStats,
            SystemStats,
            ApiResponse<User>,
            ApiResponse<Ground>,
            ApiResponse<BookingDetails>,
            ApiResponse<PaymentDetails>,
            ApiResponse<SlotAvailability>,
            ApiResponse<SystemStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Grounds", description = "Ground registry"),
        (name = "Bookings", description = "Slot availability and bookings"),
        (name = "Payments", description = "Simulated payments, verification and refunds"),
        (name = "Admin", description = "User management and statistics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

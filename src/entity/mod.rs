pub mod audit_logs;
pub mod bookings;
pub mod grounds;
pub mod payments;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use bookings::Entity as Bookings;
pub use grounds::Entity as Grounds;
pub use payments::Entity as Payments;
pub use users::Entity as Users;

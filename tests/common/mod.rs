#![allow(dead_code)]

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use tokio::sync::{Mutex, MutexGuard};
use turf_booking_api::{
    db::{create_pool, run_migrations},
    entity::{
        grounds::{ActiveModel as GroundActive, Model as GroundModel},
        users::{ActiveModel as UserActive, Role},
    },
    middleware::auth::AuthUser,
    state::{AppState, TokenSettings},
};
use uuid::Uuid;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// DB-backed tests truncate shared tables, so tests in one binary take turns.
pub async fn serial() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        secret: "integration-test-secret".into(),
        ttl_hours: 1,
    }
}

pub fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// Connect, migrate and wipe the schema. `None` when no database is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let Some(database_url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB-backed tests.");
        return Ok(None);
    };

    let pool = create_pool(&database_url, 10).await?;
    let state = AppState::new(pool, token_settings());
    run_migrations(&state.orm).await?;

    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE payments, bookings, grounds, audit_logs, users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(Some(state))
}

pub async fn create_user(state: &AppState, role: Role, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{} account", role.as_str())),
        email: Set(email.to_string()),
        phone: Set("9876543210".into()),
        password_hash: Set("dummy".into()),
        role: Set(role),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
        name: user.name,
        email: user.email,
    })
}

pub async fn create_ground(
    state: &AppState,
    manager: &AuthUser,
    slots: &[&str],
) -> anyhow::Result<GroundModel> {
    let ground = GroundActive {
        id: Set(Uuid::new_v4()),
        name: Set("Riverside Turf".into()),
        location: Set("North Bank".into()),
        price_per_slot: Set(1500),
        available_slots: Set(slots.iter().map(|s| s.to_string()).collect()),
        manager_id: Set(manager.user_id),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(ground)
}

use turf_booking_api::{
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const SEED_PASSWORD: &str = "Password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url, 2).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let admin_id =
        ensure_user(&pool, "Admin User", "admin@example.com", "9000000001", "admin").await?;
    let manager_id = ensure_user(
        &pool,
        "Jane Manager",
        "groundmanager@example.com",
        "9000000002",
        "groundManager",
    )
    .await?;
    ensure_user(
        &pool,
        "Bob Payment",
        "paymentmanager@example.com",
        "9000000003",
        "paymentManager",
    )
    .await?;
    let user_id = ensure_user(&pool, "John Doe", "user@example.com", "9000000004", "user").await?;

    let ground_id = seed_grounds(&pool, manager_id).await?;
    seed_booking(&pool, user_id, ground_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    println!("All seeded accounts use the password {SEED_PASSWORD}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    phone: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(SEED_PASSWORD)?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

/// Returns the id of the first ground managed by `manager_id`.
async fn seed_grounds(pool: &sqlx::PgPool, manager_id: Uuid) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM grounds WHERE manager_id = $1 ORDER BY created_at LIMIT 1")
            .bind(manager_id)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        println!("Grounds already seeded");
        return Ok(id);
    }

    let grounds: Vec<(&str, &str, i64, Vec<&str>)> = vec![
        (
            "Riverside Turf",
            "North Bank, Sector 4",
            1200,
            vec!["06:00-07:00", "07:00-08:00", "17:00-18:00", "18:00-19:00"],
        ),
        (
            "Greenfield Arena",
            "Old Town Road",
            1800,
            vec!["09:00-10:00", "10:00-11:00", "19:00-20:00", "20:00-21:00"],
        ),
    ];

    let mut first = None;
    for (name, location, price, slots) in grounds {
        let id = Uuid::new_v4();
        let slots: Vec<String> = slots.into_iter().map(String::from).collect();
        sqlx::query(
            r#"
            INSERT INTO grounds (id, name, location, price_per_slot, available_slots, manager_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(location)
        .bind(price)
        .bind(slots)
        .bind(manager_id)
        .execute(pool)
        .await?;
        first.get_or_insert(id);
    }

    println!("Seeded grounds");
    first.ok_or_else(|| anyhow::anyhow!("no grounds seeded"))
}

async fn seed_booking(pool: &sqlx::PgPool, user_id: Uuid, ground_id: Uuid) -> anyhow::Result<()> {
    let booking_date = chrono::Utc::now().date_naive() + chrono::Duration::days(1);
    sqlx::query(
        r#"
        INSERT INTO bookings (id, user_id, ground_id, booking_date, time_slot)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(ground_id)
    .bind(booking_date)
    .bind("17:00-18:00")
    .execute(pool)
    .await?;

    println!("Seeded a pending booking for {booking_date}");
    Ok(())
}

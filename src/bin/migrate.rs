use turf_booking_api::db::{create_pool, orm_from_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = create_pool(&database_url, 1).await?;
    run_migrations(&orm_from_pool(pool)).await?;
    println!("Migrations applied");
    Ok(())
}

use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, SqlxPostgresConnector, Statement};
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Schema files compiled into the binary, in the order they are applied.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_users.sql", include_str!("../migrations/0001_users.sql")),
    ("0002_grounds.sql", include_str!("../migrations/0002_grounds.sql")),
    ("0003_bookings.sql", include_str!("../migrations/0003_bookings.sql")),
    ("0004_payments.sql", include_str!("../migrations/0004_payments.sql")),
    ("0005_audit_logs.sql", include_str!("../migrations/0005_audit_logs.sql")),
];

/// Create the shared Postgres pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Wrap an existing pool in a SeaORM connection so both layers share connections.
pub fn orm_from_pool(pool: DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
}

/// Apply every embedded migration. All files are idempotent, so this runs on each start.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    let backend = conn.get_database_backend();
    for (name, sql) in MIGRATIONS {
        tracing::debug!(file = name, "applying migration");
        for stmt in split_statements(sql) {
            conn.execute(Statement::from_string(backend, stmt)).await?;
        }
    }
    Ok(())
}

/// Postgres prepared statements cannot hold several commands, so files are
/// split on `;`. Statements must not contain literal semicolons.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}

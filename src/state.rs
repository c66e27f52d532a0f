use std::sync::Arc;

use crate::db::{DbPool, OrmConn, orm_from_pool};

/// Signing settings for bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub tokens: Arc<TokenSettings>,
}

impl AppState {
    pub fn new(pool: DbPool, tokens: TokenSettings) -> Self {
        let orm = orm_from_pool(pool.clone());
        Self {
            pool,
            orm,
            tokens: Arc::new(tokens),
        }
    }
}

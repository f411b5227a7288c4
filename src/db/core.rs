use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use tracing::{info, instrument};

use crate::config::DbConfig;
use crate::TARGET_DB;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Get access to the database pool
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    #[instrument(target = "db_query", level = "info", skip(config))]
    pub async fn new(config: &DbConfig) -> Result<Self, sqlx::Error> {
        info!(
            target: TARGET_DB,
            "Creating database pool for {}:{}/{}",
            config.host, config.port, config.database
        );

        let connect_options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;

        info!(target: TARGET_DB, "Database pool created");

        Ok(Database { pool })
    }
}

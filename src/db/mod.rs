pub mod property;
pub mod schema;

use std::time::Duration;

use anyhow::{anyhow, Result};
use diesel::{
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Pool},
    SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::{config::Config, error::AppError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Hands out one pooled connection per unit of work.
#[derive(Clone)]
pub struct Db {
    pool: DbPool,
}

impl Db {
    /// Builds the pool and brings the schema up to date.
    pub fn connect(config: &Config) -> Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
        let mut builder = DbPool::builder()
            .max_size(config.pool_max_size())
            .connection_customizer(Box::new(ConnectionOptions))
            .connection_timeout(Duration::from_secs(30));

        if config.is_in_memory() {
            // dropping the only connection drops the database
            builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = builder.build(manager)?;

        let mut pooled = pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
        info!(
            "Connected to {} ({} migrations applied)",
            config.database_url,
            applied.len()
        );

        Ok(Db { pool })
    }

    /// Runs `f` against a checked-out connection on the blocking pool. The
    /// connection goes back to the pool when `f` returns, whatever the outcome.
    pub async fn run<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, diesel::result::Error> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, AppError> {
            let mut conn = pool.get()?;
            f(&mut *conn).map_err(AppError::from)
        })
        .await?
    }
}

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Foreign key violation on {}", constraint.as_deref().unwrap_or("unknown constraint"))]
    ForeignKeyViolation { constraint: Option<String> },

    #[error("Unique violation on {}", constraint.as_deref().unwrap_or("unknown constraint"))]
    UniqueViolation { constraint: Option<String> },

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_string);
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::ForeignKeyViolation { constraint };
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Connection pool setup, migrations and connectivity checks
pub struct DatabaseManager;

impl DatabaseManager {
    /// Read DATABASE_URL from the environment
    pub fn database_url() -> Result<String, DatabaseError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        url::Url::parse(&url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        Ok(url)
    }

    /// Create the shared pool using the configured limits
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(database_url)
            .await?;

        info!("Created database pool for: {}", Self::redact(database_url));
        Ok(pool)
    }

    /// Apply the embedded SQL migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Strip credentials from a connection string before it is logged
    pub fn redact(database_url: &str) -> String {
        match url::Url::parse(database_url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.into()
            }
            Err(_) => "<invalid database url>".to_string(),
        }
    }
}

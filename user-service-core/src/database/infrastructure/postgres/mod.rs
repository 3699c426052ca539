//! PostgreSQL adapter for the user store.
//!
//! The `users` table plays the role of the document collection. It is created
//! on first connect, the same way a document store creates a collection on
//! first write; there is no migration history.

pub mod users;

use std::{fmt, str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::{debug, info};

use crate::error::{BackendError, Result, UserStoreError};

pub use users::PostgresUserCollection;

const CREATE_USERS_COLLECTION: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        object_id   UUID PRIMARY KEY,
        user_id     BIGINT NOT NULL CHECK (user_id > 0),
        name        TEXT NOT NULL,
        inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_USER_ID_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_user_id_key ON users (user_id)";

/// Pool tuning for the Postgres store.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    max_connections: u32,
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresStore {
    /// Dial the store, check liveness, and make sure the users collection
    /// exists.
    pub async fn connect(uri: &str, settings: &PoolSettings) -> Result<Self> {
        let connect_options = PgConnectOptions::from_str(uri).map_err(|e| {
            UserStoreError::Connection {
                message: format!("invalid connection string: {e}"),
            }
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(connect_error)?;

        let store = Self {
            pool,
            max_connections: settings.max_connections,
        };
        store.ping().await?;
        store.ensure_collection().await?;

        info!(
            max_connections = settings.max_connections,
            "Connected to PostgreSQL user store"
        );
        Ok(store)
    }

    /// Wrap an existing pool, e.g. one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        let max_connections = pool.options().get_max_connections();
        Self {
            pool,
            max_connections,
        }
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(ping_error)
    }

    pub async fn ensure_collection(&self) -> Result<()> {
        for statement in [CREATE_USERS_COLLECTION, CREATE_USER_ID_INDEX] {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                UserStoreError::Connection {
                    message: format!("failed to prepare users collection: {e}"),
                }
            })?;
        }
        debug!("users collection ready");
        Ok(())
    }

    pub fn users(&self) -> PostgresUserCollection {
        PostgresUserCollection::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_error(err: sqlx::Error) -> UserStoreError {
    UserStoreError::Connection {
        message: err.to_string(),
    }
}

fn ping_error(err: sqlx::Error) -> UserStoreError {
    UserStoreError::Ping {
        message: err.to_string(),
    }
}

pub(crate) fn backend_error(err: sqlx::Error) -> BackendError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return BackendError::DuplicateKey {
                constraint: db_err.constraint().unwrap_or("unknown").to_string(),
            };
        }
        return BackendError::Database(db_err.message().to_string());
    }

    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => BackendError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => BackendError::Decode(err.to_string()),
        other => BackendError::Database(other.to_string()),
    }
}

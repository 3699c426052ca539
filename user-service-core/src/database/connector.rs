use std::{any::type_name_of_val, fmt, sync::Arc, time::Duration};

use crate::database::ports::users::UserCollection;

#[cfg(feature = "postgres")]
use crate::database::infrastructure::postgres::{PoolSettings, PostgresStore};
#[cfg(feature = "postgres")]
use crate::error::Result;

/// Connection settings accepted by [`StoreConnector::connect_with`].
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Upper bound for listing the whole collection.
    pub list_timeout: Duration,
    pub pool: PoolSettings,
}

#[cfg(feature = "postgres")]
impl StoreOptions {
    pub fn new(list_timeout: Duration) -> Self {
        Self {
            list_timeout,
            pool: PoolSettings::default(),
        }
    }
}

/// Long-lived handle to the user store.
///
/// Cloning shares the underlying pool. Repository operations borrow the
/// resolved collection; only [`StoreConnector::close`] at shutdown releases
/// the pool.
#[derive(Clone)]
pub struct StoreConnector {
    users: Arc<dyn UserCollection>,
    list_timeout: Duration,
    #[cfg(feature = "postgres")]
    postgres: Option<Arc<PostgresStore>>,
}

impl fmt::Debug for StoreConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConnector")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("list_timeout", &self.list_timeout)
            .finish_non_exhaustive()
    }
}

impl StoreConnector {
    /// Connect with default pool settings.
    ///
    /// Fails with `UserStoreError::Connection` when the dial fails and with
    /// `UserStoreError::Ping` when the liveness check fails.
    #[cfg(feature = "postgres")]
    pub async fn connect(uri: &str, list_timeout: Duration) -> Result<Self> {
        Self::connect_with(uri, &StoreOptions::new(list_timeout)).await
    }

    #[cfg(feature = "postgres")]
    pub async fn connect_with(uri: &str, options: &StoreOptions) -> Result<Self> {
        let postgres = Arc::new(PostgresStore::connect(uri, &options.pool).await?);
        Ok(Self::from_postgres(postgres, options.list_timeout))
    }

    #[cfg(feature = "postgres")]
    pub fn from_postgres(postgres: Arc<PostgresStore>, list_timeout: Duration) -> Self {
        Self {
            users: Arc::new(postgres.users()),
            list_timeout,
            postgres: Some(postgres),
        }
    }

    /// Wrap an arbitrary collection implementation, such as
    /// [`InMemoryUserCollection`](crate::database::infrastructure::memory::InMemoryUserCollection).
    pub fn from_collection(users: Arc<dyn UserCollection>, list_timeout: Duration) -> Self {
        Self {
            users,
            list_timeout,
            #[cfg(feature = "postgres")]
            postgres: None,
        }
    }

    /// The fixed `users` collection.
    pub fn users(&self) -> &Arc<dyn UserCollection> {
        &self.users
    }

    pub fn list_timeout(&self) -> Duration {
        self.list_timeout
    }

    /// Release pooled connections. Only call during process shutdown.
    pub async fn close(&self) {
        #[cfg(feature = "postgres")]
        if let Some(postgres) = &self.postgres {
            postgres.close().await;
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::database::ports::users::UserCollection;
use crate::error::{BackendError, BackendResult};
use crate::user::{InsertedId, User, UserId};

const USER_ID_CONSTRAINT: &str = "users_user_id_key";

/// Process-local `UserCollection` used by tests and local runs without a
/// database. Enforces the same id uniqueness and positivity rules as the
/// Postgres collection.
#[derive(Debug, Default)]
pub struct InMemoryUserCollection {
    documents: RwLock<Vec<(InsertedId, User)>>,
    latency: Option<Duration>,
    injected_failure: Mutex<Option<BackendError>>,
}

impl InMemoryUserCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` to emulate a slow store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call fail with `error`.
    pub async fn fail_next_with(&self, error: BackendError) {
        *self.injected_failure.lock().await = Some(error);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn before_call(&self) -> BackendResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.injected_failure.lock().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserCollection for InMemoryUserCollection {
    async fn find_latest(&self) -> BackendResult<Option<User>> {
        self.before_call().await?;
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .map(|(_, user)| user)
            .max_by_key(|user| user.user_id)
            .cloned())
    }

    async fn insert_one(&self, user: &User) -> BackendResult<InsertedId> {
        self.before_call().await?;
        if user.user_id.as_i64() <= 0 {
            return Err(BackendError::Database(format!(
                "user_id must be positive, got {}",
                user.user_id
            )));
        }

        let mut documents = self.documents.write().await;
        if documents.iter().any(|(_, doc)| doc.user_id == user.user_id) {
            return Err(BackendError::DuplicateKey {
                constraint: USER_ID_CONSTRAINT.to_string(),
            });
        }

        let inserted_id = InsertedId::generate();
        documents.push((inserted_id, user.clone()));
        debug!(user_id = %user.user_id, %inserted_id, "in-memory insert");
        Ok(inserted_id)
    }

    async fn find_by_id(&self, user_id: UserId) -> BackendResult<Option<User>> {
        self.before_call().await?;
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|(_, user)| user.user_id == user_id)
            .map(|(_, user)| user.clone()))
    }

    async fn find_all(&self) -> BackendResult<Vec<User>> {
        self.before_call().await?;
        let documents = self.documents.read().await;
        Ok(documents.iter().map(|(_, user)| user.clone()).collect())
    }
}

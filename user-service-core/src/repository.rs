//! User repository: the contract offered to transport adapters.
//!
//! # Invariants
//! - `create_user` performs one allocator read and one insert, in that order.
//! - `get_user_by_id` and `get_users` perform exactly one read each.
//! - `get_users` is bounded by the connector's list timeout.
//! - Every operation returns `UserStoreError::Canceled` as soon as the
//!   caller's token fires; the pending store call is dropped, which releases
//!   its pooled connection.
//! - Nothing is retried here. Errors carry the operation name and, where
//!   relevant, the id or name involved.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::allocator::IdAllocator;
use crate::database::StoreConnector;
use crate::error::{BackendError, Result, UserStoreError};
use crate::user::{CreatedUser, NewUser, User, UserId};

const CREATE_USER: &str = "create_user";
const GET_USER_BY_ID: &str = "get_user_by_id";
const GET_USERS: &str = "get_users";

/// Stateless facade over the shared store connector. Cheap to clone; every
/// clone shares the same pool.
#[derive(Clone, Debug)]
pub struct UserRepository {
    connector: StoreConnector,
    allocator: IdAllocator,
}

impl UserRepository {
    pub fn new(connector: StoreConnector) -> Self {
        let allocator = IdAllocator::new(connector.users().clone());
        Self {
            connector,
            allocator,
        }
    }

    /// Store `user` under the next sequential id.
    #[instrument(
        name = "user_repository.create_user",
        skip_all,
        fields(name = %user.name),
        level = "debug"
    )]
    pub async fn create_user(
        &self,
        user: NewUser,
        cancel: &CancellationToken,
    ) -> Result<CreatedUser> {
        let user_id = until_canceled(cancel, CREATE_USER, async {
            self.allocator
                .next_id()
                .await
                .map_err(|source| UserStoreError::Allocation {
                    name: user.name.clone(),
                    source,
                })
        })
        .await?;

        let user = user.with_id(user_id);
        let inserted_id = until_canceled(cancel, CREATE_USER, async {
            self.connector.users().insert_one(&user).await.map_err(|source| {
                UserStoreError::Insert {
                    user_id,
                    name: user.name.clone(),
                    source,
                }
            })
        })
        .await?;

        info!(user_id = %user.user_id, %inserted_id, "Created user");
        Ok(CreatedUser { user, inserted_id })
    }

    #[instrument(
        name = "user_repository.get_user_by_id",
        skip(self, cancel),
        level = "debug"
    )]
    pub async fn get_user_by_id(
        &self,
        user_id: UserId,
        cancel: &CancellationToken,
    ) -> Result<User> {
        let found = until_canceled(cancel, GET_USER_BY_ID, async {
            self.connector
                .users()
                .find_by_id(user_id)
                .await
                .map_err(|source| UserStoreError::Query {
                    operation: GET_USER_BY_ID,
                    source,
                })
        })
        .await?;

        found.ok_or(UserStoreError::NotFound { user_id })
    }

    /// All records in store-defined order.
    #[instrument(name = "user_repository.get_users", skip_all, level = "debug")]
    pub async fn get_users(&self, cancel: &CancellationToken) -> Result<Vec<User>> {
        let list_timeout = self.connector.list_timeout();
        let users = until_canceled(cancel, GET_USERS, async {
            match tokio::time::timeout(list_timeout, self.connector.users().find_all())
                .await
            {
                Ok(result) => result.map_err(|source| UserStoreError::Query {
                    operation: GET_USERS,
                    source,
                }),
                Err(_) => Err(UserStoreError::Query {
                    operation: GET_USERS,
                    source: BackendError::TimedOut(list_timeout),
                }),
            }
        })
        .await?;

        debug!(count = users.len(), "Retrieved users");
        Ok(users)
    }
}

/// Drive `operation` until it finishes or `cancel` fires, whichever comes
/// first. An already-cancelled token never starts the operation.
async fn until_canceled<T, F>(
    cancel: &CancellationToken,
    operation: &'static str,
    future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(UserStoreError::Canceled { operation });
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UserStoreError::Canceled { operation }),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn precancelled_token_never_polls_the_operation() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&polled);
        let result: Result<()> = until_canceled(&token, "probe", async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(UserStoreError::Canceled { operation: "probe" })
        ));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn completed_operation_wins_over_live_token() {
        let token = CancellationToken::new();
        let result = until_canceled(&token, "probe", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_a_pending_operation() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: Result<()> = until_canceled(&token, "probe", async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .await;

        assert!(result.unwrap_err().is_canceled());
    }
}

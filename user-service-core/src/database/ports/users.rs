use async_trait::async_trait;

use crate::error::BackendResult;
use crate::user::{InsertedId, User, UserId};

// Collection-level access to user documents. Each call is a single store
// round trip; callers compose them and own timeouts and cancellation.
#[async_trait]
pub trait UserCollection: Send + Sync {
    /// The record with the numerically greatest id, if any.
    async fn find_latest(&self) -> BackendResult<Option<User>>;

    /// Insert one record. Fails with `BackendError::DuplicateKey` when the id
    /// is already taken.
    async fn insert_one(&self, user: &User) -> BackendResult<InsertedId>;

    async fn find_by_id(&self, user_id: UserId) -> BackendResult<Option<User>>;

    /// Every record, in store-defined order.
    async fn find_all(&self) -> BackendResult<Vec<User>>;
}

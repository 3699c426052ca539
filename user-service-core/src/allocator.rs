//! Sequential user id allocation.
//!
//! The next id is `max(existing) + 1`, or `1` for an empty collection. The
//! read is not atomic with the caller's insert: two writers can observe the
//! same maximum. The collection's unique index turns that into a duplicate-key
//! insert failure rather than a silent collision.

use std::sync::Arc;

use tracing::debug;

use crate::database::ports::users::UserCollection;
use crate::error::{BackendError, BackendResult};
use crate::user::UserId;

#[derive(Clone)]
pub struct IdAllocator {
    users: Arc<dyn UserCollection>,
}

impl std::fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAllocator").finish_non_exhaustive()
    }
}

impl IdAllocator {
    pub fn new(users: Arc<dyn UserCollection>) -> Self {
        Self { users }
    }

    /// Performs exactly one read against the collection.
    pub async fn next_id(&self) -> BackendResult<UserId> {
        let next = match self.users.find_latest().await? {
            Some(latest) => latest.user_id.next().ok_or_else(|| {
                BackendError::Database(format!(
                    "user id space exhausted after {}",
                    latest.user_id
                ))
            })?,
            None => UserId::FIRST,
        };

        debug!(next_user_id = %next, "allocated user id");
        Ok(next)
    }
}

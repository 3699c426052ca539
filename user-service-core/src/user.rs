use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sequentially allocated user identifier. Stored records always carry a
/// strictly positive value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Identifier handed out when the collection is empty.
    pub const FIRST: UserId = UserId(1);

    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// The identifier following this one, or `None` on overflow.
    pub fn next(self) -> Option<UserId> {
        self.0.checked_add(1).map(UserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

impl User {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

/// Input to `create_user`. The identifier is always allocated by the
/// repository, so there is no way to supply one here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn with_id(self, user_id: UserId) -> User {
        User {
            user_id,
            name: self.name,
        }
    }
}

/// Store-assigned token for a single insert, analogous to a document
/// store's object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertedId(pub Uuid);

impl InsertedId {
    /// Time-ordered token generated client side before the write.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for InsertedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a successful `create_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    #[serde(flatten)]
    pub user: User,
    pub inserted_id: InsertedId,
}

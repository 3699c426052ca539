use std::time::Duration;

use thiserror::Error;

use crate::user::UserId;

/// Failure reported by a collection adapter.
///
/// Adapters translate driver-specific errors into these variants so the
/// repository can wrap them with operation context without depending on the
/// driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("duplicate key on `{constraint}`")]
    DuplicateKey { constraint: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error("store did not answer within {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl BackendError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

/// Errors surfaced by the store connector and the user repository.
#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("failed to connect to user store: {message}")]
    Connection { message: String },

    #[error("user store did not answer liveness check: {message}")]
    Ping { message: String },

    #[error("failed to allocate next user id for {name:?}: {source}")]
    Allocation {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to insert user {user_id} ({name:?}): {source}")]
    Insert {
        user_id: UserId,
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("user {user_id} not found")]
    NotFound { user_id: UserId },

    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("{operation} canceled by caller")]
    Canceled { operation: &'static str },
}

impl UserStoreError {
    /// `NotFound` is an expected outcome rather than a store fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    /// True when an insert lost the allocation race to a concurrent writer.
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::Insert { source, .. } if source.is_duplicate_key())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Query { source, .. } if source.is_timeout())
    }

    /// Construction-time failures; the process must not start after one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Ping { .. })
    }
}

pub type Result<T> = std::result::Result<T, UserStoreError>;
pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_error_reports_duplicate_source() {
        let err = UserStoreError::Insert {
            user_id: UserId(7),
            name: "Ada".into(),
            source: BackendError::DuplicateKey {
                constraint: "users_user_id_key".into(),
            },
        };

        assert!(err.is_duplicate_id());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("user 7"));
        assert!(err.to_string().contains("\"Ada\""));
    }

    #[test]
    fn query_timeout_is_distinguishable_from_not_found() {
        let timeout = UserStoreError::Query {
            operation: "get_users",
            source: BackendError::TimedOut(Duration::from_millis(25)),
        };
        let missing = UserStoreError::NotFound { user_id: UserId(99) };

        assert!(timeout.is_timeout());
        assert!(!timeout.is_not_found());
        assert!(missing.is_not_found());
        assert_eq!(timeout.to_string(), "get_users failed: store did not answer within 25ms");
    }
}

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

use user_service_core::UserStoreError;

/// Status codes carried by failed RPC calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcCode {
    InvalidArgument,
    NotFound,
    Cancelled,
    DeadlineExceeded,
    Unavailable,
    Internal,
}

impl RpcCode {
    pub fn http_status(self) -> StatusCode {
        match self {
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::NotFound => StatusCode::NOT_FOUND,
            RpcCode::Cancelled | RpcCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            RpcCode::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: RpcCode,
    pub message: String,
}

impl RpcStatus {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidArgument, message)
    }
}

impl fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcStatus {}

impl IntoResponse for RpcStatus {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}

impl From<UserStoreError> for RpcStatus {
    fn from(err: UserStoreError) -> Self {
        let code = if err.is_not_found() {
            RpcCode::NotFound
        } else if err.is_canceled() {
            RpcCode::Cancelled
        } else if err.is_timeout() {
            RpcCode::DeadlineExceeded
        } else if err.is_duplicate_id() {
            RpcCode::Unavailable
        } else {
            RpcCode::Internal
        };

        if code == RpcCode::Internal {
            tracing::error!(error = %err, "rpc call failed");
        }
        Self::new(code, err.to_string())
    }
}

impl From<JsonRejection> for RpcStatus {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_argument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_service_core::{BackendError, UserId};

    #[test]
    fn codes_serialize_in_rpc_spelling() {
        let status = RpcStatus::new(RpcCode::DeadlineExceeded, "slow");
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "code": "DEADLINE_EXCEEDED", "message": "slow" })
        );
    }

    #[test]
    fn store_errors_map_to_rpc_codes() {
        let not_found = RpcStatus::from(UserStoreError::NotFound { user_id: UserId(3) });
        assert_eq!(not_found.code, RpcCode::NotFound);
        assert_eq!(not_found.code.http_status(), StatusCode::NOT_FOUND);

        let canceled = RpcStatus::from(UserStoreError::Canceled {
            operation: "get_user_by_id",
        });
        assert_eq!(canceled.code, RpcCode::Cancelled);

        let failed = RpcStatus::from(UserStoreError::Query {
            operation: "get_user_by_id",
            source: BackendError::Database("boom".into()),
        });
        assert_eq!(failed.code, RpcCode::Internal);
    }
}

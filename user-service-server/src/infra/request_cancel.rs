use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::infra::app_state::AppState;

/// Per-request cancellation handle.
///
/// The token is a child of the server shutdown token. It is cancelled when
/// the server shuts down or when this extractor is dropped, which happens
/// when the handler future is dropped (client gone, response deadline hit).
#[derive(Debug)]
pub struct RequestCancel {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestCancel {
    pub fn child_of(parent: &CancellationToken) -> Self {
        let token = parent.child_token();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl FromRequestParts<AppState> for RequestCancel {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::child_of(&state.shutdown))
    }
}

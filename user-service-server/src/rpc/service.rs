use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use user_service_core::{UserId, UserRepository};

use super::status::RpcStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserResponse {
    pub user_id: i64,
    pub name: String,
}

/// `UserService` as exposed on the RPC listener.
#[derive(Debug, Clone)]
pub struct UserRpcService {
    repository: UserRepository,
}

impl UserRpcService {
    pub const NAME: &'static str = "UserService";

    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, cancel), fields(user_id = request.user_id))]
    pub async fn get_user(
        &self,
        request: GetUserRequest,
        cancel: &CancellationToken,
    ) -> Result<GetUserResponse, RpcStatus> {
        let user = self
            .repository
            .get_user_by_id(UserId(request.user_id), cancel)
            .await?;

        Ok(GetUserResponse {
            user_id: request.user_id,
            name: user.name,
        })
    }
}

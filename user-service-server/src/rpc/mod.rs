//! JSON-framed RPC adapter. Each method is served as
//! `POST /<Service>/<Method>`; failures carry an [`RpcStatus`] body.

pub mod service;
pub mod status;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::infra::{app_state::AppState, request_cancel::RequestCancel};

pub use service::{GetUserRequest, GetUserResponse, UserRpcService};
pub use status::{RpcCode, RpcStatus};

pub const GET_USER_PATH: &str = "/UserService/GetUser";

pub async fn get_user_rpc_handler(
    State(state): State<AppState>,
    cancel: RequestCancel,
    payload: Result<Json<GetUserRequest>, JsonRejection>,
) -> Result<Json<GetUserResponse>, RpcStatus> {
    let Json(request) = payload?;
    let service = UserRpcService::new(state.repository.clone());
    service.get_user(request, cancel.token()).await.map(Json)
}

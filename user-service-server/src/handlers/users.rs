use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use user_service_core::{CreatedUser, NewUser, User, UserId};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    request_cancel::RequestCancel,
};

pub const CREATED_MESSAGE: &str = "User created successfully";

/// Body of `POST /createUser`.
///
/// Unknown fields are ignored, which includes any `userId` the caller sends;
/// identifiers are always allocated server side.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub result: CreatedUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserQuery {
    pub id: Option<String>,
}

#[instrument(skip_all)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    cancel: RequestCancel,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<Json<CreateUserResponse>> {
    let Json(request) = payload?;

    let created = state
        .repository
        .create_user(NewUser::new(request.name), cancel.token())
        .await?;

    info!(
        user_id = %created.user.user_id,
        inserted_id = %created.inserted_id,
        "createUser served"
    );

    Ok(Json(CreateUserResponse {
        message: CREATED_MESSAGE,
        result: created,
    }))
}

#[instrument(skip_all)]
pub async fn get_users_handler(
    State(state): State<AppState>,
    cancel: RequestCancel,
) -> AppResult<Json<Vec<User>>> {
    let users = state.repository.get_users(cancel.token()).await?;
    Ok(Json(users))
}

#[instrument(skip_all)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    cancel: RequestCancel,
    query: Result<Query<GetUserQuery>, QueryRejection>,
) -> AppResult<Json<User>> {
    let Query(query) = query?;
    let user_id = parse_user_id(query.id.as_deref())?;
    let user = state
        .repository
        .get_user_by_id(user_id, cancel.token())
        .await?;
    Ok(Json(user))
}

fn parse_user_id(raw: Option<&str>) -> AppResult<UserId> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("query parameter `id` is required"))?;

    raw.parse::<i64>()
        .map(UserId)
        .map_err(|_| AppError::bad_request(format!("`{raw}` is not a valid user id")))
}

use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::{ServiceBuilder, timeout::error::Elapsed};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::RequestBodyTimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers::{
        health_handler,
        users::{create_user_handler, get_user_handler, get_users_handler},
    },
    infra::{app_state::AppState, config::CorsConfig, errors::AppError},
    rpc::{self, RpcCode, RpcStatus},
};

/// REST-style routes with CORS, tracing, the body read deadline
/// (`read_timeout`) and the response deadline (`write_timeout`).
pub fn create_http_router(state: AppState) -> Router {
    let server = &state.config.server;
    let read_timeout = server.read_timeout;
    let write_timeout = server.write_timeout;
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/createUser", post(create_user_handler))
        .route("/getUsers", get(get_users_handler))
        .route("/getUser", get(get_user_handler))
        .route("/health", get(health_handler))
        .layer(RequestBodyTimeoutLayer::new(read_timeout))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(http_deadline_error))
                .timeout(write_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// RPC listener routes. Deadline failures are reported as RPC statuses.
pub fn create_rpc_router(state: AppState) -> Router {
    let read_timeout = state.config.server.read_timeout;
    let write_timeout = state.config.server.write_timeout;

    Router::new()
        .route(rpc::GET_USER_PATH, post(rpc::get_user_rpc_handler))
        .layer(RequestBodyTimeoutLayer::new(read_timeout))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(rpc_deadline_error))
                .timeout(write_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn http_deadline_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        warn!("request exceeded the response deadline");
        AppError::gateway_timeout("request deadline exceeded")
    } else {
        AppError::internal(format!("unhandled middleware error: {err}"))
    }
}

async fn rpc_deadline_error(err: BoxError) -> RpcStatus {
    if err.is::<Elapsed>() {
        warn!("rpc call exceeded the response deadline");
        RpcStatus::new(RpcCode::DeadlineExceeded, "request deadline exceeded")
    } else {
        RpcStatus::new(RpcCode::Internal, format!("unhandled middleware error: {err}"))
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(600))
}

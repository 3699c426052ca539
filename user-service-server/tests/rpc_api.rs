mod common;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use user_service_core::{
    BackendError, NewUser,
    database::InMemoryUserCollection,
};
use user_service_server::rpc::{GET_USER_PATH, GetUserResponse, RpcCode, RpcStatus};

use common::{TEST_TIMEOUT, build_test_app, build_test_app_with, test_config};

#[tokio::test]
async fn get_user_returns_the_stored_record() -> Result<()> {
    let app = build_test_app();
    let cancel = CancellationToken::new();
    app.state
        .repository
        .create_user(NewUser::new("Ada"), &cancel)
        .await?;
    app.state
        .repository
        .create_user(NewUser::new("Grace"), &cancel)
        .await?;
    let server = app.rpc()?;

    let response = server
        .post(GET_USER_PATH)
        .json(&json!({ "userId": 2 }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<GetUserResponse>(),
        GetUserResponse {
            user_id: 2,
            name: "Grace".to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_not_found() -> Result<()> {
    let server = build_test_app().rpc()?;

    let response = server
        .post(GET_USER_PATH)
        .json(&json!({ "userId": 99 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let status: RpcStatus = response.json();
    assert_eq!(status.code, RpcCode::NotFound);
    assert!(status.message.contains("99"));
    Ok(())
}

#[tokio::test]
async fn missing_user_id_is_invalid_argument() -> Result<()> {
    let server = build_test_app().rpc()?;

    let response = server.post(GET_USER_PATH).json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_ARGUMENT");
    Ok(())
}

#[tokio::test]
async fn store_failure_is_internal() -> Result<()> {
    let collection = Arc::new(InMemoryUserCollection::new());
    let app = build_test_app_with(collection.clone(), test_config(TEST_TIMEOUT, TEST_TIMEOUT));
    let server = app.rpc()?;
    collection
        .fail_next_with(BackendError::Database("relation \"users\" does not exist".into()))
        .await;

    let response = server
        .post(GET_USER_PATH)
        .json(&json!({ "userId": 1 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<RpcStatus>().code, RpcCode::Internal);
    Ok(())
}

#[tokio::test]
async fn slow_call_is_deadline_exceeded() -> Result<()> {
    let collection = Arc::new(InMemoryUserCollection::new().with_latency(Duration::from_secs(5)));
    let app = build_test_app_with(
        collection,
        test_config(TEST_TIMEOUT, Duration::from_millis(50)),
    );
    let server = app.rpc()?;

    let response = server
        .post(GET_USER_PATH)
        .json(&json!({ "userId": 1 }))
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.json::<RpcStatus>().code, RpcCode::DeadlineExceeded);
    Ok(())
}

#[tokio::test]
async fn shutdown_in_flight_is_cancelled() -> Result<()> {
    let collection = Arc::new(InMemoryUserCollection::new().with_latency(Duration::from_secs(5)));
    let app = build_test_app_with(collection, test_config(TEST_TIMEOUT, TEST_TIMEOUT));
    let server = app.rpc()?;

    let shutdown = app.state.shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
    });

    let response = server
        .post(GET_USER_PATH)
        .json(&json!({ "userId": 1 }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<RpcStatus>().code, RpcCode::Cancelled);
    Ok(())
}

#[tokio::test]
async fn http_routes_are_not_served_on_the_rpc_listener() -> Result<()> {
    let server = build_test_app().rpc()?;
    server
        .get("/getUsers")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

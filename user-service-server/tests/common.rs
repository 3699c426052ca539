use std::{sync::Arc, time::Duration};

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use tokio_util::sync::CancellationToken;
use user_service_core::{
    UserRepository,
    database::{InMemoryUserCollection, StoreConnector, UserCollection},
};
use user_service_server::{
    AppState, create_http_router, create_rpc_router,
    infra::config::{Config, ConfigMetadata, CorsConfig, ServerConfig, StoreConfig},
};

pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

// Code is used by test modules, but not in this scope
#[allow(unused)]
pub struct TestApp {
    pub state: AppState,
    pub collection: Arc<dyn UserCollection>,
}

#[allow(unused)]
impl TestApp {
    pub fn http(&self) -> Result<TestServer> {
        TestServer::builder()
            .build(create_http_router(self.state.clone()))
            .map_err(|err| anyhow!(err.to_string()))
    }

    pub fn rpc(&self) -> Result<TestServer> {
        TestServer::builder()
            .build(create_rpc_router(self.state.clone()))
            .map_err(|err| anyhow!(err.to_string()))
    }
}

#[allow(unused)]
pub fn test_config(list_timeout: Duration, write_timeout: Duration) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rpc_port: 0,
            read_timeout: TEST_TIMEOUT,
            write_timeout,
        },
        store: StoreConfig {
            url: "postgres://localhost/users_test".to_string(),
            list_timeout,
            max_connections: 1,
            connect_timeout: Duration::from_secs(1),
        },
        cors: CorsConfig::default(),
        metadata: ConfigMetadata::default(),
    }
}

#[allow(unused)]
pub fn build_test_app() -> TestApp {
    build_test_app_with(
        Arc::new(InMemoryUserCollection::new()),
        test_config(TEST_TIMEOUT, TEST_TIMEOUT),
    )
}

#[allow(unused)]
pub fn build_test_app_with(collection: Arc<dyn UserCollection>, config: Config) -> TestApp {
    let connector = StoreConnector::from_collection(collection.clone(), config.store.list_timeout);
    let state = AppState::new(
        UserRepository::new(connector),
        Arc::new(config),
        CancellationToken::new(),
    );
    TestApp { state, collection }
}

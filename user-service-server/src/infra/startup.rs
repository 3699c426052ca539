use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    infra::{app_state::AppState, config::ServerConfig},
    routes::{create_http_router, create_rpc_router},
    rpc::UserRpcService,
};

/// The two sockets the service listens on.
#[derive(Debug)]
pub struct Listeners {
    pub http: TcpListener,
    pub rpc: TcpListener,
}

impl Listeners {
    pub async fn bind(server: &ServerConfig) -> Result<Self> {
        let http = TcpListener::bind((server.host.as_str(), server.port))
            .await
            .with_context(|| {
                format!("failed to bind HTTP listener on {}:{}", server.host, server.port)
            })?;
        let rpc = TcpListener::bind((server.host.as_str(), server.rpc_port))
            .await
            .with_context(|| {
                format!("failed to bind RPC listener on {}:{}", server.host, server.rpc_port)
            })?;
        Ok(Self { http, rpc })
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        Ok(self.http.local_addr()?)
    }

    pub fn rpc_addr(&self) -> Result<SocketAddr> {
        Ok(self.rpc.local_addr()?)
    }
}

/// Serve HTTP and RPC until `state.shutdown` is cancelled, then drain both.
pub async fn serve(state: AppState, listeners: Listeners) -> Result<()> {
    info!(addr = %listeners.http_addr()?, "HTTP listener ready");
    info!(
        addr = %listeners.rpc_addr()?,
        service = UserRpcService::NAME,
        "RPC listener ready"
    );

    let http = axum::serve(listeners.http, create_http_router(state.clone()))
        .with_graceful_shutdown(state.shutdown.clone().cancelled_owned());
    let rpc = axum::serve(listeners.rpc, create_rpc_router(state.clone()))
        .with_graceful_shutdown(state.shutdown.clone().cancelled_owned());

    let result = tokio::try_join!(
        async { http.await.context("HTTP listener failed") },
        async { rpc.await.context("RPC listener failed") },
    );

    // One listener failing takes the other down with it.
    state.shutdown.cancel();
    result.map(|_| ())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = shutdown.cancelled() => return,
    }

    info!("shutdown signal received; draining listeners");
    shutdown.cancel();
}

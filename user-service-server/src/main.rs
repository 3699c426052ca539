use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use user_service_core::{UserRepository, database::StoreConnector};
use user_service_server::{
    AppState,
    infra::{
        config::{Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigWarnings},
        startup::{self, Listeners},
        telemetry,
    },
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "user-service")]
#[command(about = "Stores user records and serves them over HTTP and RPC")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// RPC port (overrides config)
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Listen host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Connect to the store, check liveness, ensure the collection and exit
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = load_runtime_config(&cli.serve)?;
    telemetry::init_tracing();
    telemetry::log_config(&config, &warnings);

    if let Some(Command::Db(DbCommand::Ping)) = cli.command {
        return run_db_ping(&config).await;
    }

    run_server(config).await
}

fn load_runtime_config(
    args: &ServeArgs,
) -> anyhow::Result<(Config, ConfigWarnings)> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(rpc_port) = args.rpc_port {
        config.server.rpc_port = rpc_port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    if config.server.port != 0 && config.server.port == config.server.rpc_port {
        anyhow::bail!(
            "HTTP and RPC listeners cannot share port {}",
            config.server.port
        );
    }

    Ok((config, warnings))
}

async fn connect_store(config: &Config) -> anyhow::Result<StoreConnector> {
    StoreConnector::connect_with(&config.store.url, &config.store.store_options())
        .await
        .with_context(|| format!("failed to open user store at {}", config.store.redacted_url()))
}

async fn run_db_ping(config: &Config) -> anyhow::Result<()> {
    let connector = connect_store(config).await?;
    info!("user store is reachable and the users collection exists");
    connector.close().await;
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let connector = connect_store(&config).await?;
    info!("connected to user store");

    let listeners = Listeners::bind(&config.server).await?;

    let shutdown = CancellationToken::new();
    let repository = UserRepository::new(connector.clone());
    let state = AppState::new(repository, Arc::new(config), shutdown.clone());

    let signal = tokio::spawn(startup::shutdown_signal(shutdown.clone()));
    let served = startup::serve(state, listeners).await;

    shutdown.cancel();
    let _ = signal.await;
    connector.close().await;
    info!("user service stopped");

    served
}

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use irr_server::{compile_installation, recon, router, ApiState, SharedAddressSpace};
use tokio::signal;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "irrigationd", version, about = "Irriflow irrigation controller daemon")]
struct Cli {
    /// Installation file (YAML).
    #[arg(long, default_value = "configs/irrigation.yaml")]
    config: PathBuf,

    /// Override the listen address from the installation file.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut installation = irr_project::load_installation(&cli.config)?;
    if let Some(listen) = cli.listen {
        installation.server.listen = listen;
    }

    let runtime = compile_installation(&installation)?;
    info!(
        listen = %runtime.config.listen,
        namespace = %runtime.config.namespace_uri,
        interval_s = runtime.config.update_interval.as_secs(),
        "starting irrigation server"
    );
    for station in runtime.system.stations() {
        info!(
            station = station.id(),
            description = station.description(),
            station_type = station.station_type().as_str(),
            valves = station.valve_count(),
            "station configured"
        );
    }

    let space: SharedAddressSpace = Arc::new(RwLock::new(runtime.space));
    let state = ApiState {
        space: space.clone(),
        discovery: Arc::new(runtime.discovery),
        nodeset: Arc::new(runtime.nodeset),
    };

    // Single writer of the model: the reconciliation task owns it outright.
    tokio::spawn(recon::run(
        runtime.system,
        space,
        runtime.config.update_interval,
    ));

    let listener = tokio::net::TcpListener::bind(runtime.config.listen).await?;
    info!("listening on http://{}", runtime.config.listen);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}

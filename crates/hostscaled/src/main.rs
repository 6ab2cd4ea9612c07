//! hostscaled — the hostscale daemon.
//!
//! Single binary that assembles:
//! - Host inventory (redb)
//! - Group scaler + webhook driver registry
//! - REST API
//!
//! # Usage
//!
//! ```text
//! hostscaled standalone --config /etc/hostscale/hostscale.toml --port 8090
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hostscale_api::ApiState;
use hostscale_autoscale::{DriverRegistry, Fleet, GroupScaler};
use hostscale_state::HostStore;

use config::{DaemonConfig, LogFormat};

#[derive(Parser)]
#[command(name = "hostscaled", about = "hostscale daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server and scaler in one process.
    Standalone {
        /// Path to hostscale.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Data directory for the host inventory.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Seconds an execute call may run before the caller gets a 504.
        #[arg(long)]
        request_timeout_secs: Option<u64>,

        /// Allow concurrent scale requests for the same host template.
        #[arg(long)]
        no_group_lock: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Standalone {
            config,
            port,
            data_dir,
            request_timeout_secs,
            no_group_lock,
        } => {
            let mut cfg = DaemonConfig::load(config.as_deref())?;
            if let Some(port) = port {
                cfg.server.port = port;
            }
            if let Some(dir) = data_dir {
                cfg.server.data_dir = dir;
            }
            if let Some(secs) = request_timeout_secs {
                cfg.server.request_timeout_secs = secs;
            }
            if no_group_lock {
                cfg.scaling.group_lock = false;
            }

            init_tracing(&cfg)?;
            run_standalone(cfg).await
        }
    }
}

fn init_tracing(cfg: &DaemonConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(cfg.log_filter())?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match cfg.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn run_standalone(cfg: DaemonConfig) -> anyhow::Result<()> {
    info!("hostscale daemon starting in standalone mode");
    debug!(config = %cfg.to_toml_string()?, "effective configuration");

    std::fs::create_dir_all(&cfg.server.data_dir)?;
    let db_path = cfg.db_path();

    // ── Initialize subsystems ──────────────────────────────────

    let store = HostStore::open(&db_path)?;
    info!(path = ?db_path, "host store opened");

    let fleet: Arc<dyn Fleet> = Arc::new(store.clone());
    let mut scaler = GroupScaler::new(fleet);
    if !cfg.scaling.group_lock {
        scaler = scaler.without_group_lock();
        warn!("group lock disabled; concurrent requests may overshoot bounds");
    }

    let registry = DriverRegistry::with_builtin(scaler);
    info!(drivers = ?registry.names(), "driver registry initialized");

    // ── Start API server ───────────────────────────────────────

    let router = hostscale_api::build_router(ApiState {
        store,
        registry,
        request_timeout: cfg.request_timeout(),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));

    info!(%addr, timeout_secs = cfg.server.request_timeout_secs, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("hostscale daemon stopped");
    Ok(())
}

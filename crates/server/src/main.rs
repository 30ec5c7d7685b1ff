use clap::Parser;
use overpass::{Engine, Ephemeris};
use overpass_server::{ChannelHub, ServerConfig, ServerState, run_server, spawn_position_broadcaster};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    http_port: Option<u16>,

    #[arg(short = 'p', long)]
    rpc_port: Option<u16>,

    /// JSON track to load into the ephemeris
    #[arg(short, long)]
    ephemeris: Option<PathBuf>,

    /// Accept queries starting before the current day
    #[arg(long)]
    allow_history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overpass_server=info,overpass=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::load(path)?
        }
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.http_port {
        config.http_port = port;
    }
    if let Some(port) = args.rpc_port {
        config.rpc_port = port;
    }
    if args.ephemeris.is_some() {
        config.ephemeris = args.ephemeris;
    }
    config.allow_history |= args.allow_history;

    let ephemeris = match &config.ephemeris {
        Some(path) => {
            info!("Loading ephemeris from {}", path.display());
            Ephemeris::load(path)?
        }
        None => {
            info!("Starting with an empty ephemeris");
            Ephemeris::new()
        }
    };
    let ephemeris = Arc::new(ephemeris);

    let engine = Engine::builder()
        .config(config.engine.clone())
        .ephemeris(ephemeris.clone())
        .build()?;
    let hub = ChannelHub::new(config.channel_capacity);
    let state = ServerState::new(Arc::new(engine), ephemeris.clone(), hub.clone())
        .with_history(config.allow_history);

    if let Some(broadcast) = &config.broadcast {
        spawn_position_broadcaster(
            ephemeris,
            hub,
            broadcast.channel.clone(),
            broadcast.interval(),
        );
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal.cancel(),
            Err(e) => error!("Failed to listen for ctrl_c signal: {}", e),
        }
    });

    let rpc_listener = TcpListener::bind(config.rpc_addr()?).await?;
    let rpc = run_server(
        rpc_listener,
        state.clone(),
        Box::pin(shutdown.clone().cancelled_owned()),
    );

    #[cfg(feature = "http")]
    {
        let http_listener = TcpListener::bind(config.http_addr()?).await?;
        let http = overpass_server::transport::http::run_server(
            http_listener,
            state,
            shutdown.clone().cancelled_owned(),
        );
        tokio::try_join!(rpc, http)?;
    }

    #[cfg(not(feature = "http"))]
    rpc.await?;

    Ok(())
}

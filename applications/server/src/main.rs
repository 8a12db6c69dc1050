/// Drift Server - track catalog and media for the shuffle player
use clap::{Parser, Subcommand};
use drift_server::{create_router, library, AppState, ServerConfig};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "drift-server")]
#[command(about = "Drift shuffle player catalog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "DRIFT_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the tracks the catalog would list
    List {
        /// Music directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, env = "DRIFT_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drift_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::List { dir, config } => {
            list(dir, config).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Drift Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!(
        "Serving {} files from {} at {}",
        config.library.extension,
        config.library.music_dir.display(),
        config.library.media_prefix
    );

    if !config.library.music_dir.is_dir() {
        tracing::warn!(
            "Music directory {} does not exist, the catalog will answer 404",
            config.library.music_dir.display()
        );
    }

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let app = create_router(AppState::new(config.library));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn list(dir: Option<PathBuf>, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    let dir = dir.unwrap_or(config.library.music_dir);
    let tracks = library::scan(&dir, &config.library.extension).await?;

    if tracks.is_empty() {
        println!("No .{} files in {}", config.library.extension, dir.display());
        return Ok(());
    }

    println!("Tracks:");
    for track in &tracks {
        println!("  {}", track);
    }
    println!("{} track(s)", tracks.len());

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

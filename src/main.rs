//! CSV preview service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use csv_preview::api::{create_router, AppState};
use csv_preview::config::Config;
use csv_preview::metrics;
use csv_preview::utils::shutdown_signal;

/// Remote CSV preview service.
#[derive(Parser, Debug)]
#[command(name = "csv-preview")]
#[command(about = "Fetch a remote CSV and serve a JSON preview of its first rows")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Preview a CSV URL once and print the result.
    Preview {
        /// URL of the CSV document.
        url: String,

        /// Maximum rows to print (overrides PREVIEW_ROWS).
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging. Config errors are reported once the subscriber is up.
    let directive = Config::load()
        .unwrap_or_default()
        .log_directive(args.verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::Preview { url, rows }) => cmd_preview(&url, rows).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CSV PREVIEW - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen: {}:{}", config.bind_addr, config.port);
    println!("  Preview Rows: {}", config.preview_rows);
    println!("  Fetch Timeout: {}ms", config.fetch_timeout_ms);
    println!("  Connect Timeout: {}ms", config.connect_timeout_ms);
    println!("  Max Body: {} bytes", config.max_body_bytes);
    println!("  User-Agent: {}", config.user_agent);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Preview a URL once and print pretty JSON with metadata.
async fn cmd_preview(url: &str, rows: Option<usize>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(rows) = rows {
        if rows == 0 {
            anyhow::bail!("--rows must be at least 1");
        }
        config.preview_rows = rows;
    }

    let state = AppState::from_config(&config)?;

    let preview = state.preview.preview(url).await?;
    println!("{}", serde_json::to_string_pretty(&preview.summary())?);

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    info!("Configuration loaded successfully");
    info!("Preview rows: {}", config.preview_rows);
    info!("Fetch timeout: {}ms", config.fetch_timeout_ms);

    let mut app_state = AppState::from_config(&config)?;

    match metrics::install_prometheus() {
        Ok(handle) => {
            metrics::spawn_upkeep(handle.clone(), metrics::UPKEEP_INTERVAL);
            app_state = app_state.with_metrics(handle);
        }
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = config.socket_addr().map_err(|e| anyhow::anyhow!(e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

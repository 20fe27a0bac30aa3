// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
// Suppress clippy warnings about unknown/renamed dylint lint names
#![allow(unknown_lints, renamed_and_removed_lints, max_lines_per_file)]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use clap::Parser;
use color_eyre::eyre::Result;
use shelfd::api::{build_router, AppState};
use shelfd::catalog::{CatalogRepository, TitleMatch};
use shelfd::config::{default_store_path, load_user_config, UserConfig};
use shelfd::cors::{build_cors_layer, DEFAULT_CORS_ORIGINS};
use shelfd::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use shelfd::store::{parse_on_corrupt, JsonFileStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "127.0.0.1:7070";

/// Shelfd - library catalog inventory service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "SHELFD_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Path of the catalog file (default: ~/.shelfd/catalog.json)
    #[arg(long, env = "SHELFD_STORE_PATH")]
    store_path: Option<PathBuf>,

    /// What to do when the catalog file is unreadable: reset-empty or fail
    #[arg(long, env = "SHELFD_ON_CORRUPT")]
    on_corrupt: Option<String>,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    /// Example: --cors-origins=https://catalog.example.org,http://localhost:5173
    #[arg(
        long,
        env = "SHELFD_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        value_delimiter = ','
    )]
    cors_origins: Vec<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "SHELFD_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "SHELFD_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.shelfd/logs)
    #[arg(long, env = "SHELFD_LOG_DIR")]
    log_dir: Option<String>,
}

fn report_server_error(addr: SocketAddr, log_file: &std::path::Path, e: &std::io::Error) {
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of shelfd may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Kill the existing process:   pkill shelfd");
        eprintln!("  2. Use a different port:        shelfd --addr 127.0.0.1:7071");
        eprintln!("  3. Check what's using the port: lsof -i :{}", addr.port());
        eprintln!();
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}

#[allow(unknown_lints, max_lines_per_function, max_nesting_depth, no_expect)]
#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_dir = args.log_dir.map(PathBuf::from).unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shelfd")
            .join("logs")
    });
    let log_file = log_dir.join(LOG_FILENAME);

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        return Err(e);
    }

    // Load user-level config (~/.shelfd/config.toml); file is optional.
    let user_cfg = load_user_config().unwrap_or_else(|e| {
        warn!("Failed to load user config, using defaults: {e}");
        UserConfig::default()
    });

    let addr: SocketAddr = args.addr.parse()?;

    // CLI flags win over the config file, which wins over built-in defaults.
    let store_path = args
        .store_path
        .or(user_cfg.store.path)
        .unwrap_or_else(default_store_path);
    let on_corrupt = args
        .on_corrupt
        .as_deref()
        .map(parse_on_corrupt)
        .or(user_cfg.store.on_corrupt)
        .unwrap_or_default();
    let title_match = if user_cfg.search.case_sensitive {
        TitleMatch::CaseSensitive
    } else {
        TitleMatch::CaseInsensitive
    };

    let cors_origins: Vec<String> = args
        .cors_origins
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    info!(
        "CORS origins: {}",
        if allow_all_origins {
            "*".to_string()
        } else {
            cors_origins.join(", ")
        }
    );

    let cors = build_cors_layer(cors_origins);

    info!("Catalog store: {}", store_path.display());
    let store = JsonFileStore::new(store_path).with_on_corrupt(on_corrupt);
    let repository = CatalogRepository::open(Box::new(store))
        .await?
        .with_title_match(title_match);

    let app = build_router(AppState::new(Arc::new(repository))).layer(cors);

    info!("Starting shelfd on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            report_server_error(addr, &log_file, &e);
            return Err(e.into());
        }
    };

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = serve_result {
        report_server_error(addr, &log_file, &e);
        return Err(e.into());
    }

    info!("shelfd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Received shutdown signal, stopping server...");
}

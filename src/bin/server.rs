//! Portfolio Server — JSON page views for the portfolio site.
//!
//! Thin axum server over portfolio_lib. Content comes from the hosted table
//! store when it is configured, otherwise from a local table dump (or nothing).
//!
//! Usage:
//!   PORTFOLIO_SUPABASE_URL=https://xyz.supabase.co PORTFOLIO_SUPABASE_KEY=... portfolio-server
//!
//! Or with args:
//!   portfolio-server --config ./settings.json --bind 127.0.0.1:3000
//!   portfolio-server --data ./dump.json

use clap::Parser;
use portfolio_lib::catalog::Catalog;
use portfolio_lib::http_server::{router, AppState};
use portfolio_lib::settings::{self, Settings};
use portfolio_lib::store::{ContentStore, MemoryStore, SupabaseStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio-server")]
#[command(version, about = "Portfolio content server", long_about = None)]
struct Args {
    /// Settings file (default: user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address, overrides settings and PORTFOLIO_BIND
    #[arg(long)]
    bind: Option<String>,

    /// Serve a local JSON table dump instead of the hosted store
    #[arg(long)]
    data: Option<PathBuf>,
}

// ============================================================================
// Store selection
// ============================================================================

fn select_store(settings: &Settings, data: Option<&PathBuf>) -> (Arc<dyn ContentStore>, &'static str) {
    // 1. Explicit table dump
    if let Some(path) = data {
        match MemoryStore::load(path) {
            Ok(store) => {
                let store: Arc<dyn ContentStore> = Arc::new(store);
                return (store, "memory");
            }
            Err(e) => tracing::error!("[Server] Failed to load {}: {}", path.display(), e),
        }
    }

    // 2. Hosted store
    match SupabaseStore::from_settings(settings) {
        Ok(store) => {
            tracing::info!(
                "[Server] Store: {} (key {})",
                settings.supabase_url.as_deref().unwrap_or_default(),
                settings.masked_key().unwrap_or_default()
            );
            let store: Arc<dyn ContentStore> = Arc::new(store);
            return (store, "supabase");
        }
        Err(e) => tracing::warn!("[Server] Hosted store unavailable: {}", e),
    }

    // 3. Empty; every page renders its empty state
    tracing::warn!("[Server] Serving empty content");
    let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::default());
    (store, "memory")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[Server] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("[Server] Shutting down");
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("portfolio=info")),
        )
        .init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(settings::default_config_path);
    tracing::info!("[Server] Settings: {}", config_path.display());

    let mut settings = Settings::load_or_init(&config_path).apply_env();
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }

    let (store, store_kind) = select_store(&settings, args.data.as_ref());
    let catalog = Catalog::new(store, settings.page_sizes.clone(), settings.autoslide_interval_ms);
    let app = router(AppState::new(catalog, store_kind));

    // Bind and serve
    let listener = match tokio::net::TcpListener::bind(&settings.bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("[Server] Failed to bind to {}: {}", settings.bind, e);
            std::process::exit(1);
        }
    };

    tracing::info!("[Server] Listening on {}", settings.bind);
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!("[Server] Server error: {}", e);
        std::process::exit(1);
    }
}

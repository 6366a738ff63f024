//! # accred-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the accreditation portal.
//! Binds to configurable port (default 8080).

use accred_api::state::{AppConfig, AppState};
use accred_client::{store_from_config, welcome_from_config, GenAiConfig, MemoryStore, StoreConfig};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// In-memory development store, seeded with the `DEV_ADMIN_*` account when set.
fn development_store() -> MemoryStore {
    tracing::warn!("ACCRED_STORE_URL not set; using an in-memory store, data is lost on exit");
    let store = MemoryStore::new();
    match (
        std::env::var("DEV_ADMIN_USERNAME"),
        std::env::var("DEV_ADMIN_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
            tracing::info!(%username, "seeded development admin");
            store.with_admin(username, password)
        }
        _ => {
            tracing::warn!("no development admin configured; admin login is disabled");
            store
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("invalid configuration: {e}");
        e
    })?;

    let store_config = StoreConfig::from_env()?;
    if let Some(cfg) = &store_config {
        tracing::info!(store = %cfg.url, "participant store configured");
    }
    let store = store_from_config(store_config.as_ref(), development_store)?;

    let genai_config = GenAiConfig::from_env()?;
    match &genai_config {
        Some(cfg) => tracing::info!(model = %cfg.model, "welcome messages generated by Gemini"),
        None => tracing::warn!("GEMINI_API_KEY not set; welcome messages use the fallback text"),
    }
    let welcome = welcome_from_config(genai_config.as_ref())?;

    let port = config.port;
    let state = AppState::with_store(config, store, welcome);

    // A failed first sync is not fatal: readiness stays 503 until an admin
    // sync succeeds.
    if let Err(e) = state.sync_roster().await {
        tracing::warn!("initial roster sync failed: {e}");
    }

    let app = accred_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("accreditation portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

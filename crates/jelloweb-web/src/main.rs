//! jello web server
//!
//! Run with: cargo run -p jelloweb-web

use jelloweb_common::{Config, KeySource};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting jello web server...");

    let config = Config::load()?;
    let state = jelloweb_web::state::AppState::new(config)?;
    match state.key_source {
        KeySource::Production => info!("{}", state.key_source.describe()),
        KeySource::Development => warn!("{}", state.key_source.describe()),
    }

    let addr = state.config.bind_addr();
    let app = jelloweb_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

mod catalog;
mod config;
mod defaults;
mod error;
mod merge;
mod models;
mod routes;
mod store;
mod validation;

use std::sync::Arc;

use crate::{catalog::Catalog, config::Config};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, catalog: Catalog::new() }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmorate=debug,tower_http=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    let state = Arc::new(AppState::new(config.clone()));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

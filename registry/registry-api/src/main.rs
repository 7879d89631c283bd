use anyhow::Result;
use registry_core::{config::RegistryConfig, store::JsonFileStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod routes;

use routes::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RegistryConfig::from_env()?;
    tracing::info!("Starting registry with config: {:?}", config.runtime);

    let store = JsonFileStore::open(&config.storage.data_file).await?;
    tracing::info!("Token data file: {}", store.path().display());

    let state = AppState {
        store: Arc::new(store),
    };
    let app = create_router(state);

    let addr: SocketAddr = config.api.bind_addr.parse()?;
    tracing::info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

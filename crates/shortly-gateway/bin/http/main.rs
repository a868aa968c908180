mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shortly_core::LinkStore;
use shortly_gateway::{telemetry, App, AppState};
use shortly_storage::{InMemoryLinkStore, KeySpace, RedisLinkStore};
use tracing::info;

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting shortly gateway"
    );

    let store: Arc<dyn LinkStore> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(InMemoryLinkStore::new()),
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let keys = KeySpace::with_namespace(config.redis_namespace.clone());
            let store = RedisLinkStore::connect(redis_url, keys)
                .await
                .context("failed to connect to redis")?;
            Arc::new(store)
        }
    };

    let last_sequence = store
        .last_sequence()
        .await
        .context("failed to read the sequence counter")?;
    info!(last_sequence, "link store ready");

    let static_dir = (!config.no_static).then(|| config.static_dir.clone());
    let router = App::router(AppState::new(store), static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}

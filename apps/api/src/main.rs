mod config;
mod cv;
mod errors;
mod form;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageMode};
use crate::cv::photos::PhotoLibrary;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::persistence::{Ephemeral, JsonFile, Persistence};
use crate::store::CvStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV builder API v{}", env!("CARGO_PKG_VERSION"));

    let persistence: Box<dyn Persistence> = match config.storage {
        StorageMode::Memory => {
            info!("Using in-memory storage (records are lost on exit)");
            Box::new(Ephemeral)
        }
        StorageMode::File => {
            info!("Mirroring records to {}", config.data_file.display());
            Box::new(JsonFile::new(&config.data_file))
        }
    };
    let store = CvStore::open(persistence)?;

    let photos = PhotoLibrary::new(&config.upload_dir);
    info!("Serving photos from {}", photos.root().display());

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        photos,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // local-first tool, any origin may call

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr} (is the port already in use?)"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

//! Bracket Back binary entrypoint wiring the REST API and the storage supervisor.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_back::{
    config::{AppConfig, StorageBackend},
    dao::{
        bracket_store::{BracketStore, memory::MemoryBracketStore},
        storage::StorageError,
    },
    routes,
    services::{session_reaper, storage_supervisor},
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    spawn_storage_supervisor(app_state.clone());
    tokio::spawn(session_reaper::run(app_state.clone()));
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start the supervisor for the configured backend. Unavailable backends fall back to memory.
fn spawn_storage_supervisor(state: SharedState) {
    let backend = state.config().storage();
    match backend {
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            use bracket_back::dao::bracket_store::mongodb::{MongoBracketStore, MongoConfig};

            info!("using MongoDB storage");
            tokio::spawn(storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoBracketStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn BracketStore>)
            }));
        }
        #[cfg(feature = "couch-store")]
        StorageBackend::Couch => {
            use bracket_back::dao::bracket_store::couchdb::{CouchBracketStore, CouchConfig};

            info!("using CouchDB storage");
            tokio::spawn(storage_supervisor::run(state, || async {
                let config = CouchConfig::from_env()?;
                let store = CouchBracketStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn BracketStore>)
            }));
        }
        backend => {
            if backend != StorageBackend::Memory {
                warn!(?backend, "storage backend not compiled in; using memory storage");
            } else {
                info!("using in-memory storage; records are lost on restart");
            }
            let store: Arc<dyn BracketStore> = Arc::new(MemoryBracketStore::new());
            tokio::spawn(storage_supervisor::run(state, move || {
                let store = store.clone();
                async move { Ok::<_, StorageError>(store) }
            }));
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

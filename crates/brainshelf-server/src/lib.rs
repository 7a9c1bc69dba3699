//! HTTP surface of the Brainshelf catalog.
//!
//! # Routes
//! - `POST /submitApp`, `GET /getApps`: submission and listing
//! - `GET /apps`: listing narrowed/reordered by search, category and sort
//! - `/apps/{id}`, `/apps/{id}/rating`, `/apps/{id}/comments`: detail, edit, ratings, comments
//! - `GET /meta`, `GET /health`, `GET /events` (server-sent events)
//!
//! # Startup
//! 1. `Config::load` reads `BRAINSHELF_*` environment variables
//! 2. the store is seeded from `BRAINSHELF_SEED_PATH` when set
//! 3. `AppBuilder` wires the services; the liveness sweep loop is spawned
//! 4. axum serves until Ctrl+C / SIGTERM, then the sweep loop is stopped

use std::{
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};
use brainshelf_core::{
    app::{AppBuilder, BuildError, DailySchedule, ScheduleError, SweepConfig},
    domain::AppRecord,
    impls::{BroadcastEventSink, HttpUrlProber, InMemoryCatalogStore, JwtIdentityVerifier},
};
use thiserror::Error;
use tokio::{net::TcpListener, signal::ctrl_c};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod http;
pub mod state;

use crate::config::{Config, ConfigError};
use crate::http::{apps, engagement, meta, method_not_allowed, not_found};
use crate::state::AppState;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to read seed file {path:?}: {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse seed file {path:?}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP prober: {0}")]
    Prober(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

/// ルーティング一式（CORS とリクエストのトレースを含む）
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/submitApp",
            post(apps::submit_app).fallback(method_not_allowed),
        )
        .route("/getApps", get(apps::get_apps).fallback(method_not_allowed))
        .route("/apps", get(apps::browse_apps).fallback(method_not_allowed))
        .route(
            "/apps/{id}",
            get(apps::get_app)
                .put(apps::edit_app)
                .fallback(method_not_allowed),
        )
        .route(
            "/apps/{id}/rating",
            get(engagement::get_rating)
                .put(engagement::put_rating)
                .fallback(method_not_allowed),
        )
        .route(
            "/apps/{id}/comments",
            get(engagement::list_comments)
                .post(engagement::add_comment)
                .fallback(method_not_allowed),
        )
        .route(
            "/apps/{id}/comments/{comment_id}",
            delete(engagement::delete_comment).fallback(method_not_allowed),
        )
        .route("/meta", get(meta::meta).fallback(method_not_allowed))
        .route("/health", get(meta::health).fallback(method_not_allowed))
        .route("/events", get(meta::events).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn load_seed(path: &Path) -> Result<Vec<AppRecord>, ServerError> {
    let raw = read_to_string(path).map_err(|source| ServerError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ServerError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn start_server() -> Result<(), ServerError> {
    let config = Config::load()?;

    info!("Initializing state...");
    let store = match &config.seed_path {
        Some(path) => {
            let apps = load_seed(path)?;
            info!(count = apps.len(), ?path, "seeded catalog");
            InMemoryCatalogStore::with_apps(apps)
        }
        None => InMemoryCatalogStore::new(),
    };
    let prober = HttpUrlProber::new(config.probe_timeout)
        .map_err(|e| ServerError::Prober(Box::new(e)))?;
    let events = Arc::new(BroadcastEventSink::new(EVENT_CAPACITY));

    let app = AppBuilder::new()
        .store(Arc::new(store))
        .prober(Arc::new(prober))
        .verifier(Arc::new(JwtIdentityVerifier::new(&config.jwt_secret)))
        .events(events.clone())
        .sweep_config(SweepConfig {
            probe_timeout: config.probe_timeout,
            max_concurrent_probes: config.max_concurrent_probes,
        })
        .schedule(DailySchedule::new(config.sweep_hour, config.sweep_minute)?)
        .build()?;

    let sweep_loop = app.spawn_sweep_loop();
    info!(
        hour = config.sweep_hour,
        minute = config.sweep_minute,
        "liveness sweep scheduled (UTC)"
    );

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    let served = axum::serve(listener, router(AppState::new(&app, events)))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Server shutting down...");
    sweep_loop.shutdown_and_join().await;
    Ok(served?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

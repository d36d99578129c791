use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use http::{HeaderValue, Method, header, request};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::core::db::{async_db, migrate};

// Browsers on any local dev port plus the configured frontend
fn cors_layer(frontend_url: Option<String>) -> CorsLayer {
    let frontend_url = frontend_url.map(|url| url.trim_end_matches('/').to_string());
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                let Ok(origin) = origin.to_str() else {
                    return false;
                };
                origin.starts_with("http://localhost:")
                    || origin.starts_with("http://127.0.0.1:")
                    || frontend_url.as_deref() == Some(origin)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn app(shared_state: Arc<AppState>) -> Router {
    let cors = cors_layer(shared_state.config.frontend_url.clone());

    Router::new()
        // API routes
        .nest("/api", routes::router())
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

/// Log to stdout filtered by `RUST_LOG`, falling back to
/// `default_directives`. Does nothing if a subscriber is already set.
pub fn init_tracing(default_directives: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutting down");
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    // axum logs rejections from built-in extractors with the `axum::rejection`
    // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
    init_tracing(&format!(
        "{}=debug,tower_http=debug,axum::rejection=trace",
        env!("CARGO_CRATE_NAME")
    ));

    let db = async_db(&config.db_path)
        .await
        .context("Failed to connect to db")?;
    migrate(&db).await.context("Failed to migrate db")?;

    let shared_state = Arc::new(AppState::new(db, config));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

//! HTTP surface: chat page, widget fragments and the directory API.

pub mod api;
pub mod page;
pub mod widget;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppState;
use crate::config::AppConfig;
use crate::directory::Directory;
use crate::responder::{HttpResponder, Responder};
use crate::session::WidgetSessions;

/// Upper bound on how often idle widgets are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let responder: Arc<dyn Responder> = match config.responder.timeout() {
        Some(timeout) => Arc::new(
            HttpResponder::with_timeout(config.responder.url.clone(), timeout)
                .context("failed to build responder client")?,
        ),
        None => Arc::new(HttpResponder::new(config.responder.url.clone())),
    };
    info!(
        name: "responder.config.loaded",
        url = %config.responder.url,
        timeout_secs = ?config.responder.timeout_secs,
        "Responder configured"
    );

    let directory = if config.directory.enabled {
        let path = &config.directory.data_path;
        let directory = Directory::load(path)
            .with_context(|| format!("failed to load directory from {}", path.display()))?;
        info!(
            name: "directory.loaded",
            path = %path.display(),
            centers = directory.len(),
            "Directory loaded"
        );
        Some(Arc::new(directory))
    } else {
        None
    };

    let state = AppState {
        sessions: WidgetSessions::new(responder, config.widget.content_policy),
        directory,
        config: Arc::clone(&config),
    };

    spawn_sweeper(state.sessions.clone(), config.widget.session_idle());

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(widget::index))
        .route("/widget/{id}/submit", post(widget::submit))
        .route("/widget/{id}/reply", get(widget::reply))
        .route("/widget/{id}/close", post(widget::close));

    if let Some(directory) = state.directory.clone() {
        let api = api::router()
            .with_state(directory)
            .layer(cors_layer(&state.config.server.allowed_origins));
        app = app.nest("/api", api);
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(name: "server.cors.invalid_origin", origin = %origin, "Ignoring invalid origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Periodically drop widgets whose tab went away without closing them.
fn spawn_sweeper(sessions: WidgetSessions, idle: Duration) {
    let period = idle.min(SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(idle).await;
            if removed > 0 {
                info!(name: "widget.sessions.expired", removed, "Expired idle widgets");
            }
        }
    });
}

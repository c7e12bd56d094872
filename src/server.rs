//! Status server
//!
//! Small HTTP endpoint that keeps hosting platforms aware the process is
//! alive and reports the trigger schedule.
//!
//! - `GET /health` returns `OK`
//! - `GET /` returns the bot status as JSON

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::scheduler::ScheduleTrigger;

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Schedule trigger
    pub trigger: Arc<ScheduleTrigger>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(trigger: Arc<ScheduleTrigger>) -> Self {
        Self {
            trigger,
            start_time: Instant::now(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub schedule: String,
    pub timezone: String,
    pub running: bool,
    pub next_run: Option<DateTime<Utc>>,
    pub uptime_secs: u64,
}

async fn health() -> &'static str {
    "OK"
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let trigger = state.trigger.status();
    Json(StatusResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        schedule: trigger.config.cron,
        timezone: trigger.config.timezone,
        running: trigger.is_running,
        next_run: trigger.next_run,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Build the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the status port on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Status server listening");
    }

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Status server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TriggerConfig;
    use std::time::Duration;

    async fn spawn_server() -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
        let trigger = Arc::new(
            ScheduleTrigger::new(
                TriggerConfig::new("0 0 * * *", "America/New_York"),
                Duration::from_secs(60),
            )
            .unwrap(),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(serve(listener, AppState::new(trigger), async {
            let _ = rx.await;
        }));

        (addr, tx)
    }

    #[tokio::test]
    async fn test_health() {
        let (addr, _shutdown) = spawn_server().await;
        let body = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_status() {
        let (addr, _shutdown) = spawn_server().await;
        let status: serde_json::Value = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(status["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(status["schedule"], "0 0 * * *");
        assert_eq!(status["timezone"], "America/New_York");
        assert_eq!(status["running"], false);
        assert!(status["next_run"].is_string());
    }
}

use crate::config::Config;
use crate::state::AppState;
use crate::web::create_router;
use anyhow::Context;
use figment::{Figment, providers::Env};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub fn new() -> Result<Self, anyhow::Error> {
        let config = Self::load_config()?;

        let app_state = AppState::from_config(&config)?;

        info!(
            backend = %config.backend_base_url,
            ssr_downstream = %config.ssr_downstream,
            allowed_hosts = config.allowed_hosts().len(),
            "gateway components initialized"
        );

        Ok(App { config, app_state })
    }

    /// Load configuration from the environment.
    pub fn load_config() -> Result<Config, anyhow::Error> {
        Figment::new()
            .merge(Env::raw())
            .extract()
            .context("Failed to load config")
    }

    /// Bind the listener and serve until a shutdown signal arrives.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let router = create_router(self.app_state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(addr = %addr, "listening");

        let drain = Duration::from_secs(self.config.shutdown_timeout);
        let (signal_tx, signal_rx) = oneshot::channel();
        let server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(());
        });

        serve_with_drain(server.into_future(), signal_rx, drain).await
    }
}

/// Drive the server to completion, bounding the post-signal drain window.
///
/// Graceful shutdown stops accepting connections but waits on in-flight
/// requests; once the signal has fired they get at most `drain` before the
/// server future is dropped and the remaining connections with it.
async fn serve_with_drain<F>(
    server: F,
    signal_seen: oneshot::Receiver<()>,
    drain: Duration,
) -> Result<(), anyhow::Error>
where
    F: Future<Output = std::io::Result<()>>,
{
    let mut server = std::pin::pin!(server);
    let mut signal_seen = signal_seen;
    tokio::select! {
        result = &mut server => result.context("server error"),
        _ = &mut signal_seen => {
            warn!(drain_seconds = drain.as_secs(), "shutdown signal received, draining");
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result.context("server error"),
                Err(_) => {
                    warn!("drain window elapsed, dropping remaining connections");
                    Ok(())
                }
            }
        }
    }
}

/// Resolves when ctrl-c (or SIGTERM) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn drain_window_bounds_a_stuck_server() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();
        // In-flight work that never finishes: the drain window must end it.
        let stuck = std::future::pending::<std::io::Result<()>>();
        serve_with_drain(stuck, rx, Duration::from_secs(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_finishing_without_a_signal_returns_its_result() {
        let (_tx, rx) = oneshot::channel();
        serve_with_drain(async { Ok(()) }, rx, Duration::from_secs(5))
            .await
            .unwrap();
    }
}

use anyhow::{Context, Result};
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::handlers::AppStateInner;
use crate::api::routes::create_router;
use crate::config::Config;
use crate::db::Users;
use crate::graphql::create_schema;

/// Extra time allowed past the close timeout before giving up on the drain
const DRAIN_GRACE: Duration = Duration::from_secs(1);

pub struct Server {
    config: Config,
    router: Router,
}

impl Server {
    pub fn new(config: Config, users: Users) -> Self {
        let graphql_schema = create_schema(users.clone(), config.auth.clone());
        let state = Arc::new(AppStateInner {
            config: config.clone(),
            users,
            graphql_schema,
        });

        Self {
            router: create_router(state),
            config,
        }
    }

    /// Serve until SIGINT/SIGTERM, then drain in-flight requests
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind server to {addr}"))?;

        let port = self.config.server.port;
        if self.config.graphql.playground {
            info!("connect to http://localhost:{port}/playground for GraphQL playground");
        } else {
            info!("listening on http://localhost:{port}");
        }

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let shutdown = async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        };

        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .into_future();

        let close_timeout = self.config.close_timeout();
        let drain_deadline = async move {
            match signalled_rx.await {
                Ok(()) => tokio::time::sleep(close_timeout + DRAIN_GRACE).await,
                // The server stopped without a signal
                Err(_) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = server => result.context("Server error")?,
            _ = drain_deadline => {
                warn!(timeout_secs = close_timeout.as_secs(), "not all connections done");
            }
        }

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("shutting down..");
}

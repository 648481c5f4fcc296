//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the referrer filter in front of every route
//! - Serve until shutdown
//! - Apply configuration reloads to the filter (single writer)

use axum::{
    http::{Method, Uri},
    middleware,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::filter::ReferrerFilter;
use crate::http::middleware::referrer_filter_middleware;
use crate::lifecycle::shutdown;

/// Demo server: every route echoes the request line once the referrer
/// filter lets it through.
pub struct GateServer {
    router: Router,
    filter: ReferrerFilter,
}

impl GateServer {
    pub fn new(filter: ReferrerFilter) -> Self {
        let router = Self::build_router(filter.clone());
        Self { router, filter }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(filter: ReferrerFilter) -> Router {
        Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler))
            .layer(middleware::from_fn_with_state(filter, referrer_filter_middleware))
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, applying every config
    /// received on `config_updates` to the filter.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GateConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reloads = tokio::spawn(apply_reloads(
            self.filter.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        reloads.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the snapshot for every config update. Interface discovery runs
/// on the blocking pool so request handling never waits on it.
async fn apply_reloads(
    filter: ReferrerFilter,
    mut updates: mpsc::UnboundedReceiver<GateConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                let writer = filter.clone();
                let reload = move || writer.reload(&config.referrer_filter);
                if let Err(e) = tokio::task::spawn_blocking(reload).await {
                    tracing::error!(error = %e, "Failed to rebuild referrer filter, keeping current snapshot");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

async fn echo_handler(method: Method, uri: Uri) -> String {
    format!("{} {}\n", method, uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::FilterConfig;
    use crate::filter::{FilterSnapshot, NoopDiagnostics};

    #[tokio::test]
    async fn test_config_updates_reload_filter() {
        let filter = ReferrerFilter::with_snapshot(
            FilterSnapshot::build(&FilterConfig::default(), Vec::<String>::new()),
            Arc::new(NoopDiagnostics),
        );
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(apply_reloads(filter.clone(), updates_rx, shutdown_rx));

        let mut config = GateConfig::default();
        config.referrer_filter.allow_empty = true;
        updates_tx.send(config).unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while !filter.current().allow_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        shutdown_tx.send(()).unwrap();
        task.await.unwrap();
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use dockyard_core::HookRegistry;
use dockyard_db_memory::MemoryBackend;
use tower_http::trace::TraceLayer;

use crate::bootstrap::{BootstrapError, BootstrapReport, BootstrapServices, Bootstrapper};
use crate::config::AppConfig;
use crate::event_log::spawn_event_log;
use crate::handlers;

pub struct DockyardServer {
    addr: SocketAddr,
    app: Router,
    report: Arc<BootstrapReport>,
    backend: Arc<MemoryBackend>,
}

pub fn build_app(report: Arc<BootstrapReport>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::debug!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .with_state(report)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Wires the stores and event hooks, then runs startup reconciliation.
    ///
    /// The router is only built once reconciliation succeeds, so no request is
    /// ever served against a half-initialized platform.
    pub async fn build(self) -> Result<DockyardServer, BootstrapError> {
        let events = HookRegistry::new_shared();
        let backend = MemoryBackend::install(events.clone()).await;
        spawn_event_log(events.broadcaster());
        events.start().await;

        let services = BootstrapServices::from_backend(backend.clone(), events.readiness());
        let report = Arc::new(
            Bootstrapper::new(services, &self.config.bootstrap)
                .run()
                .await?,
        );

        Ok(DockyardServer {
            addr: self.addr,
            app: build_app(report.clone()),
            report,
            backend,
        })
    }
}

impl DockyardServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Outcome of the startup reconciliation.
    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    pub fn backend(&self) -> &Arc<MemoryBackend> {
        &self.backend
    }

    pub fn into_router(self) -> Router {
        self.app
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

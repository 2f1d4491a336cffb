//! # HTTP Server
//!
//! Combines the route groups into one router over a shared [`ApiHandler`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::lead_routes::lead_routes;
use super::observability_routes::observability_routes;
use super::product_routes::product_routes;
use crate::api::ApiHandler;
use crate::observability::Event;

/// State shared by every route.
pub struct AppState {
    pub handler: ApiHandler,
}

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(handler: ApiHandler) -> Self {
        Self::with_config(HttpServerConfig::default(), handler)
    }

    pub fn with_config(config: HttpServerConfig, handler: ApiHandler) -> Self {
        let router = Self::build_router(&config, handler);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, handler: ApiHandler) -> Router {
        let state = Arc::new(AppState { handler });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let api = Router::new()
            .merge(product_routes(state.clone()))
            .merge(lead_routes(state.clone()));

        Router::new()
            .merge(observability_routes(state))
            .nest("/api", api)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until ctrl-c.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        info!(event = %Event::ServerStart, %addr, "starting HTTP server");

        let listener = TcpListener::bind(addr).await?;
        info!(event = %Event::Serving, %addr, "listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!(event = %Event::ShutdownComplete, "server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!(event = %Event::ShutdownStart, "shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn handler() -> ApiHandler {
        ApiHandler::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(handler());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(9000);
        let server = HttpServer::with_config(config, handler());
        assert_eq!(server.socket_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_router_builds_with_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:3000".into(), "not a\norigin".into()],
            ..Default::default()
        };
        let _router = HttpServer::with_config(config, handler()).router();
    }
}

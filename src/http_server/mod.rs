//! # HTTP Server Module
//!
//! REST surface over the product and lead service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Counter snapshot
//! - `/api/products/*` - Product CRUD and dry runs
//! - `/api/leads/*` - Lead CRUD
//! - `/api/schemas/check` - Schema definition check

mod config;
mod errors;
mod lead_routes;
mod observability_routes;
mod product_routes;
mod server;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, HttpError, HttpResult};
pub use observability_routes::HealthResponse;
pub use server::{AppState, HttpServer};

//! API layer for leadschema
//!
//! Transport-independent product and lead operations.
//!
//! # Supported Operations
//!
//! - products: create, get, update, delete, list
//! - leads: create, get, update, delete, list (optionally by product)
//! - dry runs: validate lead data, check a schema definition

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult, ErrorCategory};
pub use handler::{ApiHandler, PageLimits};
pub use request::{CheckSchemaRequest, CreateLeadRequest, LeadDataRequest, ListQuery, ProductRequest};
pub use response::{
    LeadResponse, ListLeadsResponse, ListProductsResponse, ProductResponse, ValidationResponse,
};

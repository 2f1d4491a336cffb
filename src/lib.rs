//! leadschema - a product catalog whose products carry a schema, and a lead
//! store that only accepts data conforming to that schema.
//!
//! - [`schema`]: value model, schema definitions and the recursive validator
//! - [`storage`]: in-memory and file-backed record stores
//! - [`api`]: product and lead operations gated by validation
//! - [`http_server`]: REST surface over [`api`]
//! - [`cli`]: `serve`, `check-schema` and `validate` commands
//! - [`observability`]: logging setup, event names and counters

pub mod api;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod storage;

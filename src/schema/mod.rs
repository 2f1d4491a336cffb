//! Schema subsystem for leadschema
//!
//! Every product carries a schema definition; every lead write is gated by
//! validating its data against that definition before persistence.
//!
//! # Design Principles
//!
//! - Definitions are checked strictly when authored
//! - Stored definitions are parsed leniently, fresh for each validation
//! - Validation is pure, deterministic and fail-fast
//! - Failures carry one stable, human-readable message

mod classifier;
mod constraints;
mod errors;
mod parser;
mod types;
mod validator;
mod value;

pub use classifier::{classify, parse_date, Classified, DateLayout};
pub use errors::{
    Mismatch, NodeError, SchemaError, SchemaResult, ValidationError, ValidationResult, Violation,
};
pub use parser::{validate_schema_definition, ParseMode};
pub use types::{Constraints, ItemSpec, Kind, Pattern, Schema, SchemaNode};
pub use validator::{validate, ValidationOptions, Validator};
pub use value::{Map, StoreTimestamp, Value};

//! Schema and validation error types
//!
//! Two families:
//! - `SchemaError`: a schema definition is malformed (authoring time)
//! - `ValidationError`: lead data violates a well-formed schema (write time)
//!
//! Messages are stable; callers render them verbatim.

use std::fmt;

use thiserror::Error;

use super::types::Kind;

/// Result type for schema definition handling
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for data validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Why a value failed classification against a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// Null supplied for a non-null kind
    MustNotBeNull,
    /// Non-null supplied for the `null` kind
    MustBeNull,
    /// Representation does not belong to the kind
    WrongKind(Kind),
    /// String did not match any accepted date layout
    InvalidDateString,
    /// String did not parse fully as a base-10 integer
    InvalidTimestampString,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Mismatch::MustNotBeNull => "must not be null",
            Mismatch::MustBeNull | Mismatch::WrongKind(Kind::Null) => "must be null",
            Mismatch::WrongKind(Kind::String) => "must be a string",
            Mismatch::WrongKind(Kind::Number) => "must be a number",
            Mismatch::WrongKind(Kind::Double) => "must be a double (floating-point)",
            Mismatch::WrongKind(Kind::Boolean) => "must be a boolean",
            Mismatch::WrongKind(Kind::Array) => "must be an array",
            Mismatch::WrongKind(Kind::Object) => "must be an object",
            Mismatch::WrongKind(Kind::Date) => "must be a date (native date or ISO string)",
            Mismatch::WrongKind(Kind::Timestamp) => {
                "must be a timestamp (integer, numeric string, or store timestamp)"
            }
            Mismatch::InvalidDateString => "must be a valid ISO date string (e.g., RFC3339)",
            Mismatch::InvalidTimestampString => {
                "must be a numeric string representing a timestamp"
            }
        };
        f.write_str(text)
    }
}

/// A violated kind-scoped constraint and its bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Pattern(String),
    MinLength(usize),
    MaxLength(usize),
    Minimum(f64),
    Maximum(f64),
}

impl Violation {
    /// Constraint key as written in schema definitions.
    pub fn constraint(&self) -> &'static str {
        match self {
            Violation::Pattern(_) => "pattern",
            Violation::MinLength(_) => "minLength",
            Violation::MaxLength(_) => "maxLength",
            Violation::Minimum(_) => "minimum",
            Violation::Maximum(_) => "maximum",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Pattern(p) => write!(f, "does not match pattern '{}'", p),
            Violation::MinLength(n) => write!(f, "must be at least {} characters long", n),
            Violation::MaxLength(n) => write!(f, "must be at most {} characters long", n),
            Violation::Minimum(b) => write!(f, "must be greater than or equal to {}", b),
            Violation::Maximum(b) => write!(f, "must be less than or equal to {}", b),
        }
    }
}

/// A failure relative to a single value, before it is attached to a field name.
///
/// Array elements report these directly after their index, e.g.
/// `field 'tags'[2] must be a string`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    #[error("{mismatch}")]
    Mismatch { expected: Kind, mismatch: Mismatch },

    #[error("{0}")]
    Violation(Violation),

    #[error("validation failed: {0}")]
    Object(Box<ValidationError>),

    #[error("[{index}] {inner}")]
    Element { index: usize, inner: Box<NodeError> },
}

impl NodeError {
    pub(crate) fn object(inner: ValidationError) -> Self {
        NodeError::Object(Box::new(inner))
    }
}

/// First violation found while validating data against a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("data must be an object")]
    NotAnObject,

    #[error("required field '{field}' is missing")]
    MissingRequiredField { field: String },

    #[error("unknown field '{field}' is not declared in schema")]
    UnknownField { field: String },

    #[error("field '{field}' {mismatch}")]
    TypeMismatch {
        field: String,
        expected: Kind,
        mismatch: Mismatch,
    },

    #[error("field '{field}' {violation}")]
    ConstraintViolation { field: String, violation: Violation },

    #[error("object field '{field}' validation failed: {inner}")]
    NestedValidationFailure {
        field: String,
        inner: Box<ValidationError>,
    },

    #[error("field '{field}'[{index}] {inner}")]
    ArrayElementFailure {
        field: String,
        index: usize,
        inner: Box<NodeError>,
    },
}

impl ValidationError {
    /// Attaches a value-relative failure to the field it occurred in.
    pub(crate) fn at_field(field: &str, failure: NodeError) -> Self {
        let field = field.to_string();
        match failure {
            NodeError::Mismatch { expected, mismatch } => ValidationError::TypeMismatch {
                field,
                expected,
                mismatch,
            },
            NodeError::Violation(violation) => {
                ValidationError::ConstraintViolation { field, violation }
            }
            NodeError::Object(inner) => ValidationError::NestedValidationFailure { field, inner },
            NodeError::Element { index, inner } => {
                ValidationError::ArrayElementFailure { field, index, inner }
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "NOT_AN_OBJECT",
            ValidationError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            ValidationError::UnknownField { .. } => "UNKNOWN_FIELD",
            ValidationError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ValidationError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            ValidationError::NestedValidationFailure { .. } => "NESTED_VALIDATION_FAILURE",
            ValidationError::ArrayElementFailure { .. } => "ARRAY_ELEMENT_FAILURE",
        }
    }

    /// Top-level field the failure is attributed to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::MissingRequiredField { field }
            | ValidationError::UnknownField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::ConstraintViolation { field, .. }
            | ValidationError::NestedValidationFailure { field, .. }
            | ValidationError::ArrayElementFailure { field, .. } => Some(field),
        }
    }
}

/// A schema definition that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid schema: schema must be an object")]
    NotAnObject,

    /// `field` is the dotted path of the offending entry (`user.address`, `tags[]`)
    #[error("invalid schema: field '{field}' {reason}")]
    MalformedSchema { field: String, reason: String },
}

impl SchemaError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        "MALFORMED_SCHEMA"
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::NotAnObject => None,
            SchemaError::MalformedSchema { field, .. } => Some(field),
        }
    }
}

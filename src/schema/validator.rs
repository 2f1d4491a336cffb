//! Data validator
//!
//! Walks a data object in lockstep with a parsed `Schema`:
//! - fields are visited in schema declaration order
//! - the first violation aborts the walk (fail-fast)
//! - objects and arrays recurse, wrapping inner failures with their location
//!
//! The validator never mutates data and has no side effects.

use serde::{Deserialize, Serialize};

use super::classifier::{classify, Classified};
use super::errors::{NodeError, ValidationError, ValidationResult};
use super::types::{ItemSpec, Kind, Schema, SchemaNode};
use super::value::{Map, Value};

/// Tunables for a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Fail on data keys the schema does not declare, at every object level.
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

/// Recursive-descent validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Validates a data tree. The root must be an object.
    pub fn validate(&self, data: &Value, schema: &Schema) -> ValidationResult<()> {
        let object = data.as_object().ok_or(ValidationError::NotAnObject)?;
        self.validate_object(object, schema)
    }

    /// Validates one object level.
    pub fn validate_object(&self, data: &Map, schema: &Schema) -> ValidationResult<()> {
        for (name, node) in schema.fields() {
            let value = match data.get(name) {
                Some(value) => value,
                None if node.required => {
                    return Err(ValidationError::MissingRequiredField {
                        field: name.to_string(),
                    });
                }
                None => continue,
            };

            self.check_node(value, node)
                .map_err(|failure| ValidationError::at_field(name, failure))?;
        }

        if self.options.reject_unknown_fields {
            if let Some(key) = data.keys().find(|key| !schema.contains(key)) {
                return Err(ValidationError::UnknownField { field: key.clone() });
            }
        }

        Ok(())
    }

    fn check_node(&self, value: &Value, node: &SchemaNode) -> Result<(), NodeError> {
        let classified = classify(value, node.kind).map_err(|mismatch| NodeError::Mismatch {
            expected: node.kind,
            mismatch,
        })?;

        node.constraints
            .check(&classified)
            .map_err(NodeError::Violation)?;

        match (classified, &node.nested, &node.items) {
            (Classified::Object(object), Some(nested), _) => self
                .validate_object(object, nested)
                .map_err(NodeError::object),
            (Classified::Array(items), _, Some(spec)) => self.check_items(items, spec),
            _ => Ok(()),
        }
    }

    fn check_items(&self, items: &[Value], spec: &ItemSpec) -> Result<(), NodeError> {
        for (index, item) in items.iter().enumerate() {
            self.check_item(item, spec)
                .map_err(|inner| NodeError::Element {
                    index,
                    inner: Box::new(inner),
                })?;
        }
        Ok(())
    }

    fn check_item(&self, item: &Value, spec: &ItemSpec) -> Result<(), NodeError> {
        match spec {
            ItemSpec::Kind(kind) => classify(item, *kind)
                .map(|_| ())
                .map_err(|mismatch| NodeError::Mismatch {
                    expected: *kind,
                    mismatch,
                }),
            ItemSpec::Node(node) => self.check_node(item, node),
            ItemSpec::Schema(schema) => match classify(item, Kind::Object) {
                Ok(Classified::Object(object)) => self
                    .validate_object(object, schema)
                    .map_err(NodeError::object),
                Ok(_) => Ok(()),
                Err(mismatch) => Err(NodeError::Mismatch {
                    expected: Kind::Object,
                    mismatch,
                }),
            },
        }
    }
}

/// Validates `data` against `schema` with default options.
pub fn validate(data: &Value, schema: &Schema) -> ValidationResult<()> {
    Validator::new().validate(data, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    fn schema(text: &str) -> Schema {
        Schema::parse(&parse(text)).unwrap()
    }

    fn lead_schema() -> Schema {
        schema(
            r#"{
                "name": {"type": "string", "required": true},
                "email": {"type": "string", "required": true, "pattern": "@"},
                "age": {"type": "number", "minimum": 0},
                "interests": {"type": "array", "items": "string"}
            }"#,
        )
    }

    #[test]
    fn test_valid_data_passes() {
        let data = parse(
            r#"{"name": "Jane", "email": "jane@example.com", "age": 31, "interests": ["tech"]}"#,
        );
        assert!(validate(&data, &lead_schema()).is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let data = parse(r#"{"name": "Jane", "email": "jane@example.com"}"#);
        assert!(validate(&data, &lead_schema()).is_ok());
    }

    #[test]
    fn test_fields_checked_in_declaration_order() {
        let data = parse(r#"{"age": "old"}"#);
        let err = validate(&data, &lead_schema()).unwrap_err();
        assert_eq!(err.to_string(), "required field 'name' is missing");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate(&parse("[1, 2]"), &lead_schema()).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject);
        assert_eq!(err.to_string(), "data must be an object");
    }

    #[test]
    fn test_null_for_typed_field() {
        let data = parse(r#"{"name": null, "email": "a@b"}"#);
        let err = validate(&data, &lead_schema()).unwrap_err();
        assert_eq!(err.to_string(), "field 'name' must not be null");
        assert_eq!(err.code(), "TYPE_MISMATCH");
    }

    #[test]
    fn test_constraint_violation_message() {
        let data = parse(r#"{"name": "Jane", "email": "jane.example.com"}"#);
        let err = validate(&data, &lead_schema()).unwrap_err();
        assert_eq!(err.to_string(), "field 'email' does not match pattern '@'");
    }

    #[test]
    fn test_array_of_node_definitions() {
        let s = schema(r#"{"scores": {"type": "array", "items": {"type": "number", "maximum": 10}}}"#);
        let err = validate(&parse(r#"{"scores": [1, 2, 11]}"#), &s).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'scores'[2] must be less than or equal to 10"
        );
    }

    #[test]
    fn test_array_of_objects_against_schema() {
        let s = schema(
            r#"{"contacts": {"type": "array", "items": {"email": {"type": "string", "required": true}}}}"#,
        );
        let err = validate(
            &parse(r#"{"contacts": [{"email": "a@b"}, {"phone": "555"}]}"#),
            &s,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'contacts'[1] validation failed: required field 'email' is missing"
        );

        let err = validate(&parse(r#"{"contacts": ["a@b"]}"#), &s).unwrap_err();
        assert_eq!(err.to_string(), "field 'contacts'[0] must be an object");
    }

    #[test]
    fn test_nested_arrays_report_each_index() {
        let s = schema(
            r#"{"grid": {"type": "array", "items": {"type": "array", "items": "number"}}}"#,
        );
        let err = validate(&parse(r#"{"grid": [[1, 2], [3, "x"]]}"#), &s).unwrap_err();
        assert_eq!(err.to_string(), "field 'grid'[1] [1] must be a number");
    }

    #[test]
    fn test_object_without_nested_schema_accepts_any_object() {
        let s = schema(r#"{"meta": {"type": "object"}}"#);
        assert!(validate(&parse(r#"{"meta": {"anything": [1, "two"]}}"#), &s).is_ok());
    }

    #[test]
    fn test_unknown_fields_are_allowed_by_default() {
        let data = parse(r#"{"name": "Jane", "email": "a@b", "source": "ad"}"#);
        assert!(validate(&data, &lead_schema()).is_ok());
    }

    #[test]
    fn test_reject_unknown_fields_at_every_level() {
        let validator = Validator::with_options(ValidationOptions {
            reject_unknown_fields: true,
        });

        let data = parse(r#"{"name": "Jane", "email": "a@b", "source": "ad"}"#);
        let err = validator.validate(&data, &lead_schema()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown field 'source' is not declared in schema"
        );

        let s = schema(
            r#"{"user": {"type": "object", "properties": {"first": {"type": "string"}}}}"#,
        );
        let err = validator
            .validate(&parse(r#"{"user": {"first": "J", "last": "D"}}"#), &s)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "object field 'user' validation failed: unknown field 'last' is not declared in schema"
        );
    }

    #[test]
    fn test_declared_failures_win_over_unknown_fields() {
        let validator = Validator::with_options(ValidationOptions {
            reject_unknown_fields: true,
        });
        let data = parse(r#"{"extra": 1, "email": "a@b"}"#);
        let err = validator.validate(&data, &lead_schema()).unwrap_err();
        assert_eq!(err.code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_null_kind_field() {
        let s = schema(r#"{"deleted_at": {"type": "null"}}"#);
        assert!(validate(&parse(r#"{"deleted_at": null}"#), &s).is_ok());
        let err = validate(&parse(r#"{"deleted_at": 0}"#), &s).unwrap_err();
        assert_eq!(err.to_string(), "field 'deleted_at' must be null");
    }
}

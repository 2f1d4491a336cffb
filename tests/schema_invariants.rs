//! Schema Invariant Tests
//!
//! End-to-end properties of definition checking and data validation:
//! - Valid data validates; the first failure in declaration order is reported
//! - Classification is total over every value shape and kind
//! - Date and timestamp leaves accept their documented encodings
//! - Nested objects and arrays wrap their inner failures
//! - Stored schemas are parsed leniently, new definitions strictly

use leadschema::schema::{
    classify, validate, validate_schema_definition, Kind, Mismatch, Schema, StoreTimestamp,
    ValidationError, ValidationOptions, Validator, Value,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn schema(json: serde_json::Value) -> Schema {
    Schema::parse(&value(json)).unwrap()
}

fn lead_schema() -> Schema {
    schema(json!({
        "name": {"type": "string", "required": true, "minLength": 1},
        "email": {"type": "string", "pattern": "^[^@]+@[^@]+$"},
        "age": {"type": "number", "minimum": 0, "maximum": 150},
        "user_info": {
            "type": "object",
            "properties": {
                "first_name": {"type": "string", "required": true},
                "last_name": {"type": "string"}
            }
        },
        "tags": {"type": "array", "items": "string"},
        "signed_up": {"type": "date"},
        "last_seen": {"type": "timestamp"}
    }))
}

fn check(data: serde_json::Value) -> Result<(), ValidationError> {
    validate(&value(data), &lead_schema())
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn test_valid_lead_validates() {
    let result = check(json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "age": 34,
        "user_info": {"first_name": "Jane", "last_name": "Doe"},
        "tags": ["tech", "sales"],
        "signed_up": "2024-08-09T12:00:00Z",
        "last_seen": 1691582400
    }));
    assert_eq!(result, Ok(()));
}

#[test]
fn test_missing_name_is_reported() {
    let err = check(json!({"email": "jane@example.com"})).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingRequiredField {
            field: "name".into()
        }
    );
    assert_eq!(err.to_string(), "required field 'name' is missing");
}

#[test]
fn test_negative_age_violates_minimum() {
    let err = check(json!({"name": "Jane", "age": -5})).unwrap_err();
    assert_eq!(err.code(), "CONSTRAINT_VIOLATION");
    assert_eq!(err.to_string(), "field 'age' must be greater than or equal to 0");
}

#[test]
fn test_nested_first_name_missing() {
    let err = check(json!({"name": "Jane", "user_info": {"last_name": "Doe"}})).unwrap_err();
    assert_eq!(err.code(), "NESTED_VALIDATION_FAILURE");
    assert_eq!(
        err.to_string(),
        "object field 'user_info' validation failed: required field 'first_name' is missing"
    );
}

// =============================================================================
// Ordering and Determinism
// =============================================================================

/// The first failing field in declaration order wins, whatever the data order.
#[test]
fn test_first_failure_in_declaration_order() {
    let err = check(json!({"age": -5, "email": "nope", "name": "Jane"})).unwrap_err();
    assert_eq!(err.field(), Some("email"));
}

#[test]
fn test_validation_is_deterministic() {
    let data = value(json!({"name": "Jane", "tags": ["a", 1]}));
    let schema = lead_schema();
    let first = validate(&data, &schema).unwrap_err();
    for _ in 0..100 {
        assert_eq!(validate(&data, &schema).unwrap_err(), first);
    }
}

#[test]
fn test_non_object_data_rejected() {
    for data in [json!([]), json!("lead"), json!(null), json!(7)] {
        assert_eq!(check(data), Err(ValidationError::NotAnObject));
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Every pairing of value shape and kind yields a result, never a panic.
#[test]
fn test_classify_is_total() {
    let values = vec![
        Value::Null,
        Value::from(true),
        Value::from(1i64),
        Value::from(1.5),
        Value::from("text"),
        Value::from(chrono::Utc::now()),
        Value::from(StoreTimestamp {
            time: 1_691_582_400,
            increment: 1,
        }),
        Value::from(vec![Value::from(1i64)]),
        Value::object(),
    ];

    for value in &values {
        for kind in Kind::ALL {
            let _ = classify(value, kind);
        }
    }
}

#[test]
fn test_date_encodings() {
    let schema = schema(json!({"at": {"type": "date", "required": true}}));

    for accepted in [
        json!("2024-08-09T12:00:00Z"),
        json!("2024-08-09"),
        json!({"$date": "2024-08-09T12:00:00Z"}),
    ] {
        assert_eq!(validate(&value(json!({"at": accepted})), &schema), Ok(()));
    }

    let err = validate(&value(json!({"at": "08/09/2024"})), &schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "field 'at' must be a valid ISO date string (e.g., RFC3339)"
    );
}

/// Strings close to an accepted layout but not exactly in it are rejected.
#[test]
fn test_near_miss_dates_rejected() {
    let schema = schema(json!({"at": {"type": "date", "required": true}}));

    for rejected in [
        "2024-8-9",
        "2024-08-09T12:00:00+0200",
        "2024-08-09t12:00:00z",
        "2024-08-09T1:2:3",
        " 2024-08-09",
        "+2024-08-09",
        "2024-08-09 12:00:00Z",
    ] {
        let err = validate(&value(json!({"at": rejected})), &schema).unwrap_err();
        assert!(
            matches!(
                err,
                ValidationError::TypeMismatch {
                    mismatch: Mismatch::InvalidDateString,
                    ..
                }
            ),
            "{:?} gave {}",
            rejected,
            err
        );
    }

    assert_eq!(
        validate(&value(json!({"at": "2024-08-09T12:00:00-05:00"})), &schema),
        Ok(())
    );
}

#[test]
fn test_timestamp_encodings() {
    let schema = schema(json!({"at": {"type": "timestamp", "required": true}}));

    for accepted in [
        json!(1691582400),
        json!(1691582400.0),
        json!("1691582400"),
        json!({"$timestamp": {"t": 1691582400, "i": 1}}),
    ] {
        assert_eq!(validate(&value(json!({"at": accepted})), &schema), Ok(()));
    }

    let err = validate(&value(json!({"at": "soon"})), &schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "field 'at' must be a numeric string representing a timestamp"
    );
}

// =============================================================================
// Arrays and Nesting
// =============================================================================

#[test]
fn test_array_error_names_first_bad_index() {
    let err = check(json!({"name": "Jane", "tags": ["tech", "sales", 42]})).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ArrayElementFailure { index: 2, .. }
    ));
    assert_eq!(err.to_string(), "field 'tags'[2] must be a string");
}

#[test]
fn test_array_of_objects() {
    let schema = schema(json!({
        "contacts": {
            "type": "array",
            "items": {
                "email": {"type": "string", "required": true}
            }
        }
    }));

    let ok = value(json!({"contacts": [{"email": "a@b.c"}]}));
    assert_eq!(validate(&ok, &schema), Ok(()));

    let bad = value(json!({"contacts": [{"email": "a@b.c"}, {"phone": "555"}]}));
    assert_eq!(
        validate(&bad, &schema).unwrap_err().to_string(),
        "field 'contacts'[1] validation failed: required field 'email' is missing"
    );
}

#[test]
fn test_nested_validation_is_idempotent() {
    let data = value(json!({"name": "Jane", "user_info": {"first_name": "Jane"}}));
    let schema = lead_schema();
    assert_eq!(validate(&data, &schema), Ok(()));
    assert_eq!(validate(&data, &schema), Ok(()));
}

#[test]
fn test_unknown_fields_rejected_only_when_enabled() {
    let data = value(json!({
        "name": "Jane",
        "user_info": {"first_name": "Jane", "nickname": "JJ"}
    }));
    let schema = lead_schema();

    assert_eq!(validate(&data, &schema), Ok(()));

    let strict = Validator::with_options(ValidationOptions {
        reject_unknown_fields: true,
    });
    assert_eq!(
        strict.validate(&data, &schema).unwrap_err().to_string(),
        "object field 'user_info' validation failed: unknown field 'nickname' is not declared in schema"
    );
}

// =============================================================================
// Definition Checking
// =============================================================================

#[test]
fn test_definition_errors_name_the_path() {
    let err = validate_schema_definition(&value(json!({
        "user_info": {
            "type": "object",
            "properties": {"first_name": {"type": "text"}}
        }
    })))
    .unwrap_err();
    assert_eq!(err.field(), Some("user_info.first_name"));
    assert_eq!(
        err.to_string(),
        "invalid schema: field 'user_info.first_name' has unrecognized type 'text'"
    );

    let err = validate_schema_definition(&value(json!({"tags": {"type": "array"}}))).unwrap_err();
    assert_eq!(err.field(), Some("tags"));
}

#[test]
fn test_stored_schema_skips_bad_entries() {
    let stored = value(json!({
        "name": {"type": "string", "required": true},
        "legacy": "string",
        "broken": {"type": "integer"}
    }));

    assert!(validate_schema_definition(&stored).is_err());

    let schema = Schema::from_stored(&stored);
    assert_eq!(schema.len(), 1);
    assert!(schema.contains("name"));
    assert_eq!(validate(&value(json!({"name": "Jane", "broken": "x"})), &schema), Ok(()));
}

//! Schema definition parser
//!
//! One recursive walk over a raw definition, run in one of two modes:
//!
//! - `Strict`: authoring time. The first malformed entry fails the whole
//!   definition with its dotted path (`user_info.first_name`, `tags[]`).
//! - `Lenient`: stored schemas. A malformed entry is logged and skipped at
//!   its own nesting level; unknown keys are ignored and arrays may omit
//!   `items`.
//!
//! Both modes share naming, kind, nesting and constraint rules.

use indexmap::IndexMap;
use tracing::warn;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Constraints, ItemSpec, Kind, Pattern, Schema, SchemaNode};
use super::value::{Map, Value};

/// How malformed entries are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Strict,
    Lenient,
}

impl Schema {
    /// Parses a definition, rejecting anything malformed.
    pub fn parse(definition: &Value) -> SchemaResult<Schema> {
        let entries = definition.as_object().ok_or(SchemaError::NotAnObject)?;
        parse_fields(entries, "", ParseMode::Strict)
    }

    /// Parses a definition read back from storage.
    ///
    /// Never fails: malformed entries are dropped with a warning.
    pub fn from_stored(definition: &Value) -> Schema {
        match definition.as_object() {
            Some(entries) => parse_fields(entries, "", ParseMode::Lenient).unwrap_or_default(),
            None => {
                warn!(
                    found = definition.type_name(),
                    "stored schema is not a mapping, treating as empty"
                );
                Schema::default()
            }
        }
    }
}

/// Checks a schema definition before it is accepted by a product write.
pub fn validate_schema_definition(definition: &Value) -> SchemaResult<()> {
    Schema::parse(definition).map(|_| ())
}

fn parse_fields(entries: &Map, prefix: &str, mode: ParseMode) -> SchemaResult<Schema> {
    let mut fields = IndexMap::with_capacity(entries.len());

    for (name, raw) in entries {
        let path = join_path(prefix, name);
        match parse_entry(name, raw, &path, mode) {
            Ok(node) => {
                fields.insert(name.clone(), node);
            }
            Err(err) if mode == ParseMode::Lenient => {
                warn!(field = %path, error = %err, "skipping malformed schema entry");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Schema::from_fields(fields))
}

fn parse_entry(name: &str, raw: &Value, path: &str, mode: ParseMode) -> SchemaResult<SchemaNode> {
    if name.is_empty() {
        return Err(SchemaError::malformed(path, "has an empty name"));
    }
    if name.starts_with('$') {
        return Err(SchemaError::malformed(path, "must not start with '$'"));
    }
    if name.contains('.') {
        return Err(SchemaError::malformed(path, "must not contain '.'"));
    }

    let definition = raw
        .as_object()
        .ok_or_else(|| SchemaError::malformed(path, "must be a mapping"))?;
    parse_node(definition, path, mode)
}

fn parse_node(definition: &Map, path: &str, mode: ParseMode) -> SchemaResult<SchemaNode> {
    let kind = match definition.get("type") {
        None => return Err(SchemaError::malformed(path, "is missing 'type'")),
        Some(Value::Str(name)) => Kind::parse(name).ok_or_else(|| {
            SchemaError::malformed(path, format!("has unrecognized type '{}'", name))
        })?,
        Some(_) => return Err(SchemaError::malformed(path, "'type' must be a string")),
    };

    if mode == ParseMode::Strict {
        if let Some(key) = definition.keys().find(|key| !kind.allows_key(key)) {
            return Err(SchemaError::malformed(
                path,
                format!("key '{}' is not allowed for type '{}'", key, kind),
            ));
        }
    }

    // stored entries with a non-boolean flag are still type-checked, as optional
    let required = match definition.get("required") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) if mode == ParseMode::Lenient => false,
        Some(_) => return Err(SchemaError::malformed(path, "'required' must be a boolean")),
    };

    let mut node = SchemaNode::of_kind(kind);
    node.required = required;
    node.constraints = parse_constraints(definition, kind, path)?;

    match kind {
        Kind::Object => node.nested = parse_nested(definition, path, mode)?,
        Kind::Array => match definition.get("items") {
            Some(items) => node.items = Some(parse_items(items, path, mode)?),
            None if mode == ParseMode::Strict => {
                return Err(SchemaError::malformed(
                    path,
                    "of type 'array' must declare 'items'",
                ));
            }
            None => {}
        },
        _ => {}
    }

    Ok(node)
}

/// `properties` wins over `schema` when both are present.
fn parse_nested(definition: &Map, path: &str, mode: ParseMode) -> SchemaResult<Option<Schema>> {
    let (key, raw) = match definition
        .get_key_value("properties")
        .or_else(|| definition.get_key_value("schema"))
    {
        Some(found) => found,
        None => return Ok(None),
    };

    let entries = raw
        .as_object()
        .ok_or_else(|| SchemaError::malformed(path, format!("'{}' must be a mapping", key)))?;
    parse_fields(entries, path, mode).map(Some)
}

fn parse_items(raw: &Value, path: &str, mode: ParseMode) -> SchemaResult<ItemSpec> {
    let item_path = format!("{}[]", path);

    match raw {
        Value::Str(name) => Kind::parse(name).map(ItemSpec::Kind).ok_or_else(|| {
            SchemaError::malformed(item_path, format!("has unrecognized type '{}'", name))
        }),
        // A mapping whose `type` is a string describes the element itself;
        // any other mapping is a schema every element must satisfy.
        Value::Object(definition) if matches!(definition.get("type"), Some(Value::Str(_))) => {
            parse_node(definition, &item_path, mode).map(|node| ItemSpec::Node(Box::new(node)))
        }
        Value::Object(entries) => parse_fields(entries, &item_path, mode).map(ItemSpec::Schema),
        _ => Err(SchemaError::malformed(
            path,
            "'items' must be a type name or a mapping",
        )),
    }
}

/// Reads only the constraint keys scoped to `kind`.
fn parse_constraints(definition: &Map, kind: Kind, path: &str) -> SchemaResult<Constraints> {
    let mut constraints = Constraints::default();

    match kind {
        Kind::String => {
            if let Some(raw) = definition.get("pattern") {
                let source = raw
                    .as_str()
                    .ok_or_else(|| SchemaError::malformed(path, "'pattern' must be a string"))?;
                let pattern = Pattern::new(source).map_err(|_| {
                    SchemaError::malformed(
                        path,
                        format!("'pattern' is not a valid regular expression: '{}'", source),
                    )
                })?;
                constraints.pattern = Some(pattern);
            }
            constraints.min_length = length_bound(definition, "minLength", path)?;
            constraints.max_length = length_bound(definition, "maxLength", path)?;
            if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
                if min > max {
                    return Err(SchemaError::malformed(
                        path,
                        "'minLength' must not exceed 'maxLength'",
                    ));
                }
            }
        }
        Kind::Number | Kind::Double => {
            constraints.minimum = numeric_bound(definition, "minimum", path)?;
            constraints.maximum = numeric_bound(definition, "maximum", path)?;
            if let (Some(min), Some(max)) = (constraints.minimum, constraints.maximum) {
                if min > max {
                    return Err(SchemaError::malformed(
                        path,
                        "'minimum' must not exceed 'maximum'",
                    ));
                }
            }
        }
        _ => {}
    }

    Ok(constraints)
}

fn length_bound(definition: &Map, key: &str, path: &str) -> SchemaResult<Option<usize>> {
    match definition.get(key) {
        None => Ok(None),
        Some(Value::Int(n)) if *n >= 0 => usize::try_from(*n).map(Some).map_err(|_| {
            SchemaError::malformed(path, format!("'{}' is out of range", key))
        }),
        Some(_) => Err(SchemaError::malformed(
            path,
            format!("'{}' must be a non-negative integer", key),
        )),
    }
}

fn numeric_bound(definition: &Map, key: &str, path: &str) -> SchemaResult<Option<f64>> {
    match definition.get(key) {
        None => Ok(None),
        Some(Value::Int(n)) => Ok(Some(*n as f64)),
        Some(Value::Float(f)) if f.is_finite() => Ok(Some(*f)),
        Some(_) => Err(SchemaError::malformed(
            path,
            format!("'{}' must be a number", key),
        )),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

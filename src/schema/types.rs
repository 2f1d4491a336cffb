//! Normalized schema types.
//!
//! Raw schema definitions are untyped `Value` trees; `parser` turns them into
//! these nodes once so the validator never re-inspects raw shapes.
//!
//! Supported kinds:
//! - string, number, double, boolean (alias `bool`)
//! - array, object, null
//! - date, timestamp

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

/// Logical kind a value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    /// Integer or floating-point
    Number,
    /// Floating-point representation only
    Double,
    Boolean,
    Array,
    Object,
    Null,
    Date,
    Timestamp,
}

impl Kind {
    /// Every recognized kind.
    pub const ALL: [Kind; 9] = [
        Kind::String,
        Kind::Number,
        Kind::Double,
        Kind::Boolean,
        Kind::Array,
        Kind::Object,
        Kind::Null,
        Kind::Date,
        Kind::Timestamp,
    ];

    /// Parses a kind name as written in a schema definition.
    pub fn parse(name: &str) -> Option<Kind> {
        match name {
            "string" => Some(Kind::String),
            "number" => Some(Kind::Number),
            "double" => Some(Kind::Double),
            "boolean" | "bool" => Some(Kind::Boolean),
            "array" => Some(Kind::Array),
            "object" => Some(Kind::Object),
            "null" => Some(Kind::Null),
            "date" => Some(Kind::Date),
            "timestamp" => Some(Kind::Timestamp),
            _ => None,
        }
    }

    /// Returns the canonical kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Double => "double",
            Kind::Boolean => "boolean",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Null => "null",
            Kind::Date => "date",
            Kind::Timestamp => "timestamp",
        }
    }

    /// Definition keys beyond `type`, `required` and `description` that this kind accepts.
    pub fn constraint_keys(&self) -> &'static [&'static str] {
        match self {
            Kind::String => &["pattern", "minLength", "maxLength"],
            Kind::Number | Kind::Double => &["minimum", "maximum"],
            Kind::Object => &["properties", "schema"],
            Kind::Array => &["items"],
            Kind::Boolean | Kind::Null | Kind::Date | Kind::Timestamp => &[],
        }
    }

    /// Whether `key` may appear in a definition of this kind.
    pub fn allows_key(&self, key: &str) -> bool {
        matches!(key, "type" | "required" | "description") || self.constraint_keys().contains(&key)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled `pattern` constraint that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Unanchored search, as JSON-schema style patterns behave.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Kind-scoped constraint bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub pattern: Option<Pattern>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
    }
}

/// Element description for an array field.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSpec {
    /// `"items": "string"`
    Kind(Kind),
    /// `"items": {"type": "string", "minLength": 2}`
    Node(Box<SchemaNode>),
    /// `"items": {"name": {...}, "email": {...}}`, every element an object
    Schema(Schema),
}

/// Normalized per-field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: Kind,
    pub required: bool,
    /// Only for `object`
    pub nested: Option<Schema>,
    /// Only for `array`
    pub items: Option<ItemSpec>,
    pub constraints: Constraints,
}

impl SchemaNode {
    /// A bare node of the given kind with no constraints.
    pub fn of_kind(kind: Kind) -> Self {
        Self {
            kind,
            required: false,
            nested: None,
            items: None,
            constraints: Constraints::default(),
        }
    }
}

/// Ordered map of field name to node. Iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, SchemaNode>,
}

impl Schema {
    pub(crate) fn from_fields(fields: IndexMap<String, SchemaNode>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&SchemaNode> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_bool_alias() {
        assert_eq!(Kind::parse("bool"), Some(Kind::Boolean));
        assert_eq!(Kind::Boolean.as_str(), "boolean");
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(Kind::parse("integer"), None);
        assert_eq!(Kind::parse("String"), None);
    }

    #[test]
    fn test_allowed_keys_are_kind_scoped() {
        assert!(Kind::String.allows_key("pattern"));
        assert!(!Kind::Number.allows_key("pattern"));
        assert!(Kind::Double.allows_key("maximum"));
        assert!(!Kind::String.allows_key("minimum"));
        assert!(Kind::Array.allows_key("items"));
        assert!(Kind::Object.allows_key("schema"));
        assert!(Kind::Date.allows_key("description"));
        assert!(!Kind::Boolean.allows_key("items"));
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let pattern = Pattern::new("[0-9]{3}").unwrap();
        assert!(pattern.is_match("call 555 now"));
        assert!(!pattern.is_match("no digits"));
        assert_eq!(pattern.as_str(), "[0-9]{3}");
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let mut fields = IndexMap::new();
        let mut name = SchemaNode::of_kind(Kind::String);
        name.required = true;
        let mut email = SchemaNode::of_kind(Kind::String);
        email.required = true;
        fields.insert("name".to_string(), name);
        fields.insert("age".to_string(), SchemaNode::of_kind(Kind::Number));
        fields.insert("email".to_string(), email);

        let schema = Schema::from_fields(fields);
        let required: Vec<&str> = schema
            .fields()
            .filter(|(_, node)| node.required)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(required, vec!["name", "email"]);
        assert_eq!(schema.len(), 3);
    }
}

//! Stored record types
//!
//! Both record kinds serialize to one JSON document each; dynamic values
//! (`schema`, `data`) keep native dates and timestamps as extended JSON.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::Value;

/// A logical record type owning a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw schema definition, checked when authored
    pub schema: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A new product with a fresh id and timestamps.
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: Value) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description: description.into(),
            schema,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A document stored against a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub product_id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(product_id: impl Into<String>, data: Value) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            product_id: product_id.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Random v4 UUID in its 32 hex digit form.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Common shape used by stores to key, order and persist records.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Subdirectory holding this record kind under a data directory.
    const DIR: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for Product {
    const DIR: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Lead {
    const DIR: &'static str = "leads";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

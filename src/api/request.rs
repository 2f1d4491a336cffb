//! API request types
//!
//! Bodies are decoded by the transport; list parameters arrive as raw
//! strings and are parsed here, ignoring values that are not integers.

use std::collections::HashMap;

use serde::Deserialize;

use crate::schema::Value;

/// Body of product create and full-replacement update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadRequest {
    pub product_id: String,
    pub data: Value,
}

/// Body of lead update and dry-run validation.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadDataRequest {
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckSchemaRequest {
    pub schema: Value,
}

/// Listing parameters. `limit` of `None` or `0` means the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub product_id: Option<String>,
}

impl ListQuery {
    /// Builds a query from raw query-string pairs.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let number = |key: &str| params.get(key).and_then(|raw| raw.trim().parse().ok());

        Self {
            limit: number("limit"),
            offset: number("offset"),
            product_id: params
                .get("product_id")
                .filter(|id| !id.is_empty())
                .cloned(),
        }
    }
}

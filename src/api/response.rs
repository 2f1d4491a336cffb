//! API response types
//!
//! Timestamps render as RFC3339 in UTC with second precision.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::Value;
use crate::storage::{Lead, Product};

fn render_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub schema: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            schema: product.schema,
            created_at: render_time(product.created_at),
            updated_at: render_time(product.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadResponse {
    pub id: String,
    pub product_id: String,
    pub data: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            product_id: lead.product_id,
            data: lead.data,
            created_at: render_time(lead.created_at),
            updated_at: render_time(lead.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListProductsResponse {
    pub products: Vec<ProductResponse>,
    /// Count of all products, not just this page
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLeadsResponse {
    pub leads: Vec<LeadResponse>,
    /// Count of all leads matching the filter
    pub total: usize,
}

/// Outcome of a dry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
}

impl ValidationResponse {
    pub fn valid() -> Self {
        Self { valid: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_render_at_second_precision() {
        let mut product = Product::new("Loans", "Personal loans", Value::object());
        product.created_at = Utc
            .with_ymd_and_hms(2024, 8, 9, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(250))
            .unwrap();

        let response = ProductResponse::from(product);
        assert_eq!(response.created_at, "2024-08-09T12:00:00Z");
        assert_eq!(response.description, "Personal loans");
    }

    #[test]
    fn test_lead_response_keeps_data() {
        let data: Value = serde_json::from_str(r#"{"name": "Jane"}"#).unwrap();
        let lead = Lead::new("p1", data.clone());
        let response = LeadResponse::from(lead);
        assert_eq!(response.data, data);
        assert_eq!(response.product_id, "p1");
    }
}

//! API handler for leadschema
//!
//! Product and lead operations over a `Store`. Every write follows the same
//! gate:
//!
//! 1. Product writes: check the schema definition strictly
//! 2. Lead writes: fetch the product schema, parse it leniently, validate data
//! 3. Persist only when the check passed
//!
//! Operations are synchronous; transports call them directly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::observability::{Event, MetricsRegistry};
use crate::schema::{validate_schema_definition, Schema, ValidationOptions, Validator, Value};
use crate::storage::{Lead, Product, Store};

use super::errors::{ApiError, ApiResult};
use super::request::{CreateLeadRequest, LeadDataRequest, ListQuery, ProductRequest};
use super::response::{
    LeadResponse, ListLeadsResponse, ListProductsResponse, ProductResponse, ValidationResponse,
};

/// Listing bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Used when a listing asks for no limit or a limit of 0
    pub default_limit: usize,
    /// Upper bound on any requested limit
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl PageLimits {
    /// Resolves a query into `(limit, offset)`.
    pub fn resolve(&self, query: &ListQuery) -> (usize, usize) {
        let limit = match query.limit {
            None | Some(0) => self.default_limit,
            Some(limit) => limit,
        };
        (limit.min(self.max_limit), query.offset.unwrap_or(0))
    }
}

/// Whether a check guards a write or only reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Write,
    DryRun,
}

impl Gate {
    fn data_rejected(self) -> Event {
        match self {
            Gate::Write => Event::LeadRejected,
            Gate::DryRun => Event::ValidationFailed,
        }
    }

    fn schema_rejected(self) -> Event {
        match self {
            Gate::Write => Event::SchemaRejected,
            Gate::DryRun => Event::ValidationFailed,
        }
    }
}

/// Service entry point shared by the HTTP server and the CLI.
#[derive(Clone)]
pub struct ApiHandler {
    store: Arc<dyn Store>,
    metrics: Arc<MetricsRegistry>,
    validator: Validator,
    limits: PageLimits,
}

impl ApiHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            metrics: Arc::new(MetricsRegistry::new()),
            validator: Validator::new(),
            limits: PageLimits::default(),
        }
    }

    pub fn with_validation_options(mut self, options: ValidationOptions) -> Self {
        self.validator = Validator::with_options(options);
        self
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    // Products

    pub fn create_product(&self, req: ProductRequest) -> ApiResult<ProductResponse> {
        self.check_definition(&req.schema, Gate::Write)?;

        let product = Product::new(req.name, req.description, req.schema);
        self.store
            .insert_product(product.clone())
            .map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_products_created();
        info!(event = %Event::ProductCreated, product_id = %product.id, "product created");
        Ok(product.into())
    }

    pub fn get_product(&self, id: &str) -> ApiResult<ProductResponse> {
        let product = self.store.get_product(id).map_err(|e| self.storage_failure(e))?;
        Ok(product.into())
    }

    /// Replaces name, description and schema.
    pub fn update_product(&self, id: &str, req: ProductRequest) -> ApiResult<ProductResponse> {
        self.check_definition(&req.schema, Gate::Write)?;

        let mut product = self.store.get_product(id).map_err(|e| self.storage_failure(e))?;
        product.name = req.name;
        product.description = req.description;
        product.schema = req.schema;
        product.updated_at = Utc::now();

        self.store
            .update_product(product.clone())
            .map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_products_updated();
        info!(event = %Event::ProductUpdated, product_id = %id, "product updated");
        Ok(product.into())
    }

    /// Leads stored against the product are kept.
    pub fn delete_product(&self, id: &str) -> ApiResult<()> {
        self.store.delete_product(id).map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_products_deleted();
        info!(event = %Event::ProductDeleted, product_id = %id, "product deleted");
        Ok(())
    }

    pub fn list_products(&self, query: &ListQuery) -> ApiResult<ListProductsResponse> {
        let (limit, offset) = self.limits.resolve(query);

        let products = self
            .store
            .list_products(limit, offset)
            .map_err(|e| self.storage_failure(e))?;
        let total = self.store.count_products().map_err(|e| self.storage_failure(e))?;

        Ok(ListProductsResponse {
            products: products.into_iter().map(ProductResponse::from).collect(),
            total,
        })
    }

    // Leads

    pub fn create_lead(&self, req: CreateLeadRequest) -> ApiResult<LeadResponse> {
        self.check_data(&req.product_id, &req.data, Gate::Write)?;

        let lead = Lead::new(req.product_id, req.data);
        self.store
            .insert_lead(lead.clone())
            .map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_leads_created();
        info!(
            event = %Event::LeadCreated,
            lead_id = %lead.id,
            product_id = %lead.product_id,
            "lead created"
        );
        Ok(lead.into())
    }

    pub fn get_lead(&self, id: &str) -> ApiResult<LeadResponse> {
        let lead = self.store.get_lead(id).map_err(|e| self.storage_failure(e))?;
        Ok(lead.into())
    }

    /// Validates against the lead's current product, then replaces `data`.
    pub fn update_lead(&self, id: &str, req: LeadDataRequest) -> ApiResult<LeadResponse> {
        let mut lead = self.store.get_lead(id).map_err(|e| self.storage_failure(e))?;
        self.check_data(&lead.product_id, &req.data, Gate::Write)?;

        lead.data = req.data;
        lead.updated_at = Utc::now();
        self.store
            .update_lead(lead.clone())
            .map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_leads_updated();
        info!(event = %Event::LeadUpdated, lead_id = %id, "lead updated");
        Ok(lead.into())
    }

    pub fn delete_lead(&self, id: &str) -> ApiResult<()> {
        self.store.delete_lead(id).map_err(|e| self.storage_failure(e))?;

        self.metrics.increment_leads_deleted();
        info!(event = %Event::LeadDeleted, lead_id = %id, "lead deleted");
        Ok(())
    }

    pub fn list_leads(&self, query: &ListQuery) -> ApiResult<ListLeadsResponse> {
        let (limit, offset) = self.limits.resolve(query);
        let product_id = query.product_id.as_deref();

        let leads = self
            .store
            .list_leads(product_id, limit, offset)
            .map_err(|e| self.storage_failure(e))?;
        let total = self
            .store
            .count_leads(product_id)
            .map_err(|e| self.storage_failure(e))?;

        Ok(ListLeadsResponse {
            leads: leads.into_iter().map(LeadResponse::from).collect(),
            total,
        })
    }

    // Dry runs

    /// Validates data against a product's schema without persisting.
    pub fn validate_lead_data(&self, product_id: &str, data: &Value) -> ApiResult<ValidationResponse> {
        self.check_data(product_id, data, Gate::DryRun)?;
        Ok(ValidationResponse::valid())
    }

    /// Checks a schema definition without persisting.
    pub fn check_schema(&self, schema: &Value) -> ApiResult<ValidationResponse> {
        self.check_definition(schema, Gate::DryRun)?;
        info!(event = %Event::ValidationPassed, "schema definition is valid");
        Ok(ValidationResponse::valid())
    }

    fn check_definition(&self, schema: &Value, gate: Gate) -> ApiResult<()> {
        validate_schema_definition(schema).map_err(|e| {
            self.metrics.increment_schemas_rejected();
            warn!(
                event = %gate.schema_rejected(),
                code = e.code(),
                field = e.field().unwrap_or(""),
                "{}", e
            );
            ApiError::from(e)
        })
    }

    fn check_data(&self, product_id: &str, data: &Value, gate: Gate) -> ApiResult<()> {
        let definition = self
            .store
            .fetch_product_schema(product_id)
            .map_err(|e| self.storage_failure(e))?;
        let schema = Schema::from_stored(&definition);

        match self.validator.validate(data, &schema) {
            Ok(()) => {
                self.metrics.increment_validations_passed();
                if gate == Gate::DryRun {
                    info!(event = %Event::ValidationPassed, product_id = %product_id, "data is valid");
                }
                Ok(())
            }
            Err(e) => {
                self.metrics.increment_validations_failed();
                warn!(
                    event = %gate.data_rejected(),
                    product_id = %product_id,
                    code = e.code(),
                    "{}", e
                );
                Err(ApiError::from(e))
            }
        }
    }

    /// Converts a storage error, logging anything that is not a plain miss.
    fn storage_failure(&self, err: crate::storage::StorageError) -> ApiError {
        if !err.is_not_found() {
            let event = if err.is_fatal() {
                Event::StoreCorrupt
            } else {
                Event::StorageFailure
            };
            error!(event = %event, code = err.code(), error = %err, "storage operation failed");
        }
        ApiError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn handler() -> ApiHandler {
        ApiHandler::new(Arc::new(MemoryStore::new()))
    }

    fn json(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    fn product_request(schema: &str) -> ProductRequest {
        ProductRequest {
            name: "Insurance".into(),
            description: "Leads for insurance".into(),
            schema: json(schema),
        }
    }

    const SCHEMA: &str = r#"{
        "name": {"type": "string", "required": true},
        "age": {"type": "number", "minimum": 0}
    }"#;

    #[test]
    fn test_create_product_rejects_malformed_schema() {
        let h = handler();
        let err = h
            .create_product(product_request(r#"{"tags": {"type": "array"}}"#))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid schema: field 'tags' of type 'array' must declare 'items'"
        );
        assert_eq!(h.metrics().snapshot().schemas_rejected, 1);
        assert_eq!(h.list_products(&ListQuery::default()).unwrap().total, 0);
    }

    #[test]
    fn test_lead_lifecycle() {
        let h = handler();
        let product = h.create_product(product_request(SCHEMA)).unwrap();

        let lead = h
            .create_lead(CreateLeadRequest {
                product_id: product.id.clone(),
                data: json(r#"{"name": "Jane", "age": 30}"#),
            })
            .unwrap();
        assert_eq!(h.get_lead(&lead.id).unwrap().data, lead.data);

        let updated = h
            .update_lead(
                &lead.id,
                LeadDataRequest {
                    data: json(r#"{"name": "Jane Doe"}"#),
                },
            )
            .unwrap();
        assert_eq!(updated.data, json(r#"{"name": "Jane Doe"}"#));

        h.delete_lead(&lead.id).unwrap();
        assert!(matches!(h.get_lead(&lead.id), Err(ApiError::LeadNotFound(_))));

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.leads_created, 1);
        assert_eq!(snapshot.leads_updated, 1);
        assert_eq!(snapshot.leads_deleted, 1);
    }

    #[test]
    fn test_invalid_lead_is_not_persisted() {
        let h = handler();
        let product = h.create_product(product_request(SCHEMA)).unwrap();

        let err = h
            .create_lead(CreateLeadRequest {
                product_id: product.id,
                data: json(r#"{"name": "Jane", "age": -5}"#),
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "data validation failed: field 'age' must be greater than or equal to 0"
        );
        assert_eq!(h.list_leads(&ListQuery::default()).unwrap().total, 0);
        assert_eq!(h.metrics().snapshot().validations_failed, 1);
    }

    #[test]
    fn test_lead_for_missing_product() {
        let h = handler();
        let err = h
            .create_lead(CreateLeadRequest {
                product_id: "missing".into(),
                data: json("{}"),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::ProductNotFound(_)));
    }

    #[test]
    fn test_update_lead_after_product_deleted() {
        let h = handler();
        let product = h.create_product(product_request(SCHEMA)).unwrap();
        let lead = h
            .create_lead(CreateLeadRequest {
                product_id: product.id.clone(),
                data: json(r#"{"name": "Jane"}"#),
            })
            .unwrap();

        h.delete_product(&product.id).unwrap();
        // No cascade
        assert!(h.get_lead(&lead.id).is_ok());

        let err = h
            .update_lead(
                &lead.id,
                LeadDataRequest {
                    data: json(r#"{"name": "Jane"}"#),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::ProductNotFound(_)));
    }

    #[test]
    fn test_update_product_replaces_schema() {
        let h = handler();
        let product = h.create_product(product_request(SCHEMA)).unwrap();

        let updated = h
            .update_product(
                &product.id,
                ProductRequest {
                    name: "Auto".into(),
                    description: String::new(),
                    schema: json(r#"{"vin": {"type": "string", "required": true}}"#),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Auto");
        assert_eq!(updated.created_at, product.created_at);

        let err = h
            .validate_lead_data(&product.id, &json(r#"{"name": "Jane"}"#))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "data validation failed: required field 'vin' is missing"
        );
    }

    #[test]
    fn test_update_missing_product() {
        let h = handler();
        let err = h
            .update_product("nope", product_request(SCHEMA))
            .unwrap_err();
        assert!(matches!(err, ApiError::ProductNotFound(_)));
    }

    #[test]
    fn test_page_limits() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(&ListQuery::default()), (10, 0));
        assert_eq!(
            limits.resolve(&ListQuery {
                limit: Some(0),
                offset: Some(3),
                product_id: None
            }),
            (10, 3)
        );
        assert_eq!(
            limits.resolve(&ListQuery {
                limit: Some(500),
                ..ListQuery::default()
            }),
            (100, 0)
        );
    }

    #[test]
    fn test_list_products_pages_with_total() {
        let h = handler();
        for _ in 0..12 {
            h.create_product(product_request(SCHEMA)).unwrap();
        }
        let page = h.list_products(&ListQuery::default()).unwrap();
        assert_eq!(page.products.len(), 10);
        assert_eq!(page.total, 12);
    }

    #[test]
    fn test_strict_mode_rejects_unknown_fields() {
        let h = handler().with_validation_options(ValidationOptions {
            reject_unknown_fields: true,
        });
        let product = h.create_product(product_request(SCHEMA)).unwrap();
        let err = h
            .validate_lead_data(&product.id, &json(r#"{"name": "Jane", "utm": "x"}"#))
            .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_FIELD");
    }

    #[test]
    fn test_check_schema() {
        let h = handler();
        assert!(h.check_schema(&json(SCHEMA)).unwrap().valid);
        assert!(h.check_schema(&json("[]")).is_err());
    }

    #[test]
    fn test_dry_runs_report_as_validation_events() {
        assert_eq!(Gate::Write.data_rejected(), Event::LeadRejected);
        assert_eq!(Gate::Write.schema_rejected(), Event::SchemaRejected);
        assert_eq!(Gate::DryRun.data_rejected(), Event::ValidationFailed);
        assert_eq!(Gate::DryRun.schema_rejected(), Event::ValidationFailed);
    }

    #[test]
    fn test_dry_run_leaves_store_untouched() {
        let h = handler();
        let product = h.create_product(product_request(SCHEMA)).unwrap();
        assert!(h.validate_lead_data(&product.id, &json("{}")).is_err());
        assert!(h.validate_lead_data(&product.id, &json(r#"{"name": "Jane"}"#)).is_ok());

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.validations_failed, 1);
        assert_eq!(snapshot.validations_passed, 1);
        assert_eq!(snapshot.leads_created, 0);
        assert_eq!(h.list_leads(&ListQuery::default()).unwrap().total, 0);
    }
}

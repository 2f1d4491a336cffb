//! Storage subsystem for leadschema
//!
//! Products and leads are kept behind the `Store` trait. Two backends:
//!
//! - `MemoryStore`: volatile, used when no data directory is configured
//! - `FileStore`: one JSON file per record, loaded at open, written through
//!
//! # Guarantees
//!
//! - Listing follows insertion order (load order for `FileStore`)
//! - A failed write leaves the previous state visible
//! - Lock poisoning surfaces as an error, never a panic

mod errors;
mod file;
mod memory;
mod record;

pub use errors::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{new_id, Lead, Product, Record};

use crate::schema::Value;

/// Persistence boundary for products and leads.
pub trait Store: Send + Sync {
    fn insert_product(&self, product: Product) -> StorageResult<()>;

    fn get_product(&self, id: &str) -> StorageResult<Product>;

    /// Replaces a stored product with the same id.
    fn update_product(&self, product: Product) -> StorageResult<()>;

    fn delete_product(&self, id: &str) -> StorageResult<()>;

    fn list_products(&self, limit: usize, offset: usize) -> StorageResult<Vec<Product>>;

    fn count_products(&self) -> StorageResult<usize>;

    fn insert_lead(&self, lead: Lead) -> StorageResult<()>;

    fn get_lead(&self, id: &str) -> StorageResult<Lead>;

    /// Replaces a stored lead with the same id.
    fn update_lead(&self, lead: Lead) -> StorageResult<()>;

    fn delete_lead(&self, id: &str) -> StorageResult<()>;

    fn list_leads(
        &self,
        product_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<Lead>>;

    fn count_leads(&self, product_id: Option<&str>) -> StorageResult<usize>;

    /// Raw schema definition of a product.
    fn fetch_product_schema(&self, product_id: &str) -> StorageResult<Value> {
        self.get_product(product_id).map(|product| product.schema)
    }
}

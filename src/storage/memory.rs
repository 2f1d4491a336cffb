//! In-memory store
//!
//! Records live in insertion-ordered maps guarded by `RwLock`. Deleting keeps
//! the relative order of the remaining records.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use super::errors::{StorageError, StorageResult};
use super::record::{Lead, Product, Record};
use super::Store;

/// One record kind, keyed by id.
#[derive(Debug)]
pub(crate) struct Table<R> {
    rows: RwLock<IndexMap<String, R>>,
    not_found: fn(String) -> StorageError,
}

impl<R: Record> Table<R> {
    pub(crate) fn new(not_found: fn(String) -> StorageError) -> Self {
        Self {
            rows: RwLock::new(IndexMap::new()),
            not_found,
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, IndexMap<String, R>>> {
        self.rows.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, IndexMap<String, R>>> {
        self.rows.write().map_err(|_| StorageError::LockPoisoned)
    }

    pub(crate) fn contains(&self, id: &str) -> StorageResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    pub(crate) fn insert(&self, record: R) -> StorageResult<()> {
        let mut rows = self.write()?;
        if rows.contains_key(record.id()) {
            return Err(StorageError::Duplicate(record.id().to_string()));
        }
        rows.insert(record.id().to_string(), record);
        Ok(())
    }

    pub(crate) fn get(&self, id: &str) -> StorageResult<R> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| (self.not_found)(id.to_string()))
    }

    /// Replaces an existing record in place.
    pub(crate) fn replace(&self, record: R) -> StorageResult<()> {
        let mut rows = self.write()?;
        match rows.get_mut(record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err((self.not_found)(record.id().to_string())),
        }
    }

    pub(crate) fn remove(&self, id: &str) -> StorageResult<R> {
        self.write()?
            .shift_remove(id)
            .ok_or_else(|| (self.not_found)(id.to_string()))
    }

    pub(crate) fn page<F>(&self, keep: F, limit: usize, offset: usize) -> StorageResult<Vec<R>>
    where
        F: Fn(&R) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .filter(|record| keep(*record))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    pub(crate) fn count<F>(&self, keep: F) -> StorageResult<usize>
    where
        F: Fn(&R) -> bool,
    {
        Ok(self.read()?.values().filter(|record| keep(*record)).count())
    }
}

/// Volatile store used when no data directory is configured, and as the
/// index behind `FileStore`.
#[derive(Debug)]
pub struct MemoryStore {
    pub(crate) products: Table<Product>,
    pub(crate) leads: Table<Lead>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: Table::new(StorageError::ProductNotFound),
            leads: Table::new(StorageError::LeadNotFound),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn for_product<'a>(product_id: Option<&'a str>) -> impl Fn(&Lead) -> bool + 'a {
    move |lead| product_id.map_or(true, |id| lead.product_id == id)
}

impl Store for MemoryStore {
    fn insert_product(&self, product: Product) -> StorageResult<()> {
        self.products.insert(product)
    }

    fn get_product(&self, id: &str) -> StorageResult<Product> {
        self.products.get(id)
    }

    fn update_product(&self, product: Product) -> StorageResult<()> {
        self.products.replace(product)
    }

    fn delete_product(&self, id: &str) -> StorageResult<()> {
        self.products.remove(id).map(|_| ())
    }

    fn list_products(&self, limit: usize, offset: usize) -> StorageResult<Vec<Product>> {
        self.products.page(|_| true, limit, offset)
    }

    fn count_products(&self) -> StorageResult<usize> {
        self.products.count(|_| true)
    }

    fn insert_lead(&self, lead: Lead) -> StorageResult<()> {
        self.leads.insert(lead)
    }

    fn get_lead(&self, id: &str) -> StorageResult<Lead> {
        self.leads.get(id)
    }

    fn update_lead(&self, lead: Lead) -> StorageResult<()> {
        self.leads.replace(lead)
    }

    fn delete_lead(&self, id: &str) -> StorageResult<()> {
        self.leads.remove(id).map(|_| ())
    }

    fn list_leads(
        &self,
        product_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<Lead>> {
        self.leads.page(for_product(product_id), limit, offset)
    }

    fn count_leads(&self, product_id: Option<&str>) -> StorageResult<usize> {
        self.leads.count(for_product(product_id))
    }
}

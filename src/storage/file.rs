//! File-backed store
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/products/<id>.json
//! <data_dir>/leads/<id>.json
//! ```
//!
//! Every record is loaded into a `MemoryStore` index at open. Mutations are
//! written through to disk (temp file + rename) before the index changes, so
//! the index never holds a record that is not on disk.
//!
//! A record file that cannot be decoded fails the open.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::errors::{StorageError, StorageResult};
use super::memory::{MemoryStore, Table};
use super::record::{Lead, Product, Record};
use super::Store;

pub struct FileStore {
    root: PathBuf,
    index: MemoryStore,
    /// Serializes check-then-write sequences across both record kinds.
    writes: Mutex<()>,
}

impl FileStore {
    /// Opens (creating if needed) a data directory and loads every record.
    pub fn open(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        let root = data_dir.as_ref().to_path_buf();
        let index = MemoryStore::new();

        let products = load_all::<Product>(&root)?;
        let leads = load_all::<Lead>(&root)?;
        let (product_count, lead_count) = (products.len(), leads.len());

        for product in products {
            index.products.insert(product)?;
        }
        for lead in leads {
            index.leads.insert(lead)?;
        }

        info!(
            data_dir = %root.display(),
            products = product_count,
            leads = lead_count,
            "file store opened"
        );

        Ok(Self {
            root,
            index,
            writes: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.writes.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn path_for<R: Record>(&self, id: &str) -> PathBuf {
        self.root.join(R::DIR).join(format!("{}.json", id))
    }

    fn persist<R: Record>(&self, record: &R) -> StorageResult<()> {
        let path = self.path_for::<R>(record.id());
        let tmp = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::corrupt(&path, e))?;
        fs::write(&tmp, body).map_err(|e| StorageError::io("failed to write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io("failed to rename", &path, e))?;

        debug!(path = %path.display(), "record persisted");
        Ok(())
    }

    fn unlink<R: Record>(&self, id: &str) -> StorageResult<()> {
        let path = self.path_for::<R>(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("failed to remove", &path, e)),
        }
    }

    fn insert_record<R: Record>(&self, table: &Table<R>, record: R) -> StorageResult<()> {
        let _guard = self.lock()?;
        if table.contains(record.id())? {
            return Err(StorageError::Duplicate(record.id().to_string()));
        }
        self.persist(&record)?;
        table.insert(record)
    }

    fn replace_record<R: Record>(&self, table: &Table<R>, record: R) -> StorageResult<()> {
        let _guard = self.lock()?;
        // Surfaces the table's not-found error before touching disk.
        table.get(record.id())?;
        self.persist(&record)?;
        table.replace(record)
    }

    fn remove_record<R: Record>(&self, table: &Table<R>, id: &str) -> StorageResult<()> {
        let _guard = self.lock()?;
        table.get(id)?;
        self.unlink::<R>(id)?;
        table.remove(id).map(|_| ())
    }
}

/// Reads every `*.json` record of one kind, ordered by creation time then id.
fn load_all<R: Record>(root: &Path) -> StorageResult<Vec<R>> {
    let dir = root.join(R::DIR);
    fs::create_dir_all(&dir).map_err(|e| StorageError::io("failed to create", &dir, e))?;

    let entries = fs::read_dir(&dir).map_err(|e| StorageError::io("failed to read", &dir, e))?;

    let mut records = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StorageError::io("failed to read entry in", &dir, e))?
            .path();

        // Skip temp files and anything else that is not a record
        if path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }

        let content =
            fs::read_to_string(&path).map_err(|e| StorageError::io("failed to read", &path, e))?;
        let record: R =
            serde_json::from_str(&content).map_err(|e| StorageError::corrupt(&path, e))?;
        records.push(record);
    }

    records.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    Ok(records)
}

impl Store for FileStore {
    fn insert_product(&self, product: Product) -> StorageResult<()> {
        self.insert_record(&self.index.products, product)
    }

    fn get_product(&self, id: &str) -> StorageResult<Product> {
        self.index.get_product(id)
    }

    fn update_product(&self, product: Product) -> StorageResult<()> {
        self.replace_record(&self.index.products, product)
    }

    fn delete_product(&self, id: &str) -> StorageResult<()> {
        self.remove_record(&self.index.products, id)
    }

    fn list_products(&self, limit: usize, offset: usize) -> StorageResult<Vec<Product>> {
        self.index.list_products(limit, offset)
    }

    fn count_products(&self) -> StorageResult<usize> {
        self.index.count_products()
    }

    fn insert_lead(&self, lead: Lead) -> StorageResult<()> {
        self.insert_record(&self.index.leads, lead)
    }

    fn get_lead(&self, id: &str) -> StorageResult<Lead> {
        self.index.get_lead(id)
    }

    fn update_lead(&self, lead: Lead) -> StorageResult<()> {
        self.replace_record(&self.index.leads, lead)
    }

    fn delete_lead(&self, id: &str) -> StorageResult<()> {
        self.remove_record(&self.index.leads, id)
    }

    fn list_leads(
        &self,
        product_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<Lead>> {
        self.index.list_leads(product_id, limit, offset)
    }

    fn count_leads(&self, product_id: Option<&str>) -> StorageResult<usize> {
        self.index.count_leads(product_id)
    }
}

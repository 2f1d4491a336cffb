//! Metrics registry for leadschema
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Lock-free (`Relaxed` atomics)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the product/lead write paths.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    products_created: AtomicU64,
    products_updated: AtomicU64,
    products_deleted: AtomicU64,
    leads_created: AtomicU64,
    leads_updated: AtomicU64,
    leads_deleted: AtomicU64,
    /// Lead writes and dry runs that passed validation
    validations_passed: AtomicU64,
    /// Lead writes and dry runs that failed validation
    validations_failed: AtomicU64,
    /// Product writes and schema checks rejected as malformed
    schemas_rejected: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_products_created(&self) {
        bump(&self.products_created);
    }

    pub fn increment_products_updated(&self) {
        bump(&self.products_updated);
    }

    pub fn increment_products_deleted(&self) {
        bump(&self.products_deleted);
    }

    pub fn increment_leads_created(&self) {
        bump(&self.leads_created);
    }

    pub fn increment_leads_updated(&self) {
        bump(&self.leads_updated);
    }

    pub fn increment_leads_deleted(&self) {
        bump(&self.leads_deleted);
    }

    pub fn increment_validations_passed(&self) {
        bump(&self.validations_passed);
    }

    pub fn increment_validations_failed(&self) {
        bump(&self.validations_failed);
    }

    pub fn increment_schemas_rejected(&self) {
        bump(&self.schemas_rejected);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            products_created: self.products_created.load(Ordering::Relaxed),
            products_updated: self.products_updated.load(Ordering::Relaxed),
            products_deleted: self.products_deleted.load(Ordering::Relaxed),
            leads_created: self.leads_created.load(Ordering::Relaxed),
            leads_updated: self.leads_updated.load(Ordering::Relaxed),
            leads_deleted: self.leads_deleted.load(Ordering::Relaxed),
            validations_passed: self.validations_passed.load(Ordering::Relaxed),
            validations_failed: self.validations_failed.load(Ordering::Relaxed),
            schemas_rejected: self.schemas_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub products_created: u64,
    pub products_updated: u64,
    pub products_deleted: u64,
    pub leads_created: u64,
    pub leads_updated: u64,
    pub leads_deleted: u64,
    pub validations_passed: u64,
    pub validations_failed: u64,
    pub schemas_rejected: u64,
}

//! Observability events for leadschema
//!
//! Every lifecycle and write-path event has a typed name. Log lines carry it
//! as the `event` field so they can be filtered without parsing messages.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Store opened (memory or file)
    StoreOpened,
    /// Server startup begins
    ServerStart,
    /// Listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped
    ShutdownComplete,

    // Products
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    /// A product write carried a malformed schema definition
    SchemaRejected,

    // Leads
    LeadCreated,
    LeadUpdated,
    LeadDeleted,
    /// A lead write failed validation
    LeadRejected,

    // Dry runs
    ValidationPassed,
    ValidationFailed,

    // Storage
    /// A storage operation failed
    StorageFailure,
    /// A record file could not be decoded (fatal)
    StoreCorrupt,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::ServerStart => "SERVER_START",
            Event::Serving => "SERVER_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ProductCreated => "PRODUCT_CREATED",
            Event::ProductUpdated => "PRODUCT_UPDATED",
            Event::ProductDeleted => "PRODUCT_DELETED",
            Event::SchemaRejected => "SCHEMA_REJECTED",

            Event::LeadCreated => "LEAD_CREATED",
            Event::LeadUpdated => "LEAD_UPDATED",
            Event::LeadDeleted => "LEAD_DELETED",
            Event::LeadRejected => "LEAD_REJECTED",

            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",

            Event::StorageFailure => "STORAGE_FAILURE",
            Event::StoreCorrupt => "STORE_CORRUPT",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorrupt)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Job Application Tracker Library
//!
//! Recognises job postings in page markup, hands the extracted fields to a
//! short-lived relay, and keeps a durable log of the applications a user
//! records, with CSV export.
//!
//! # Design Philosophy
//!
//! - Extraction is best-effort: a missing field is an empty string, never an
//!   error
//! - One relay slot, last push wins, freshness checked on read
//! - Records are stored in insertion order; sorting is for display only
//! - Host primitives (page, storage, clock, messaging) sit behind traits
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_tracker::{ApplicationStore, Extractor, MemoryBackend, PageSnapshot, SignalRelay};
//!
//! let extractor = Extractor::default();
//! let relay = SignalRelay::new(RelayConfig::default());
//!
//! if let Some(signal) = extractor.signal(&snapshot, Utc::now()) {
//!     relay.push(signal);
//! }
//!
//! let store = ApplicationStore::new(Arc::new(MemoryBackend::new()));
//! if let Some(signal) = relay.query() {
//!     store.create(NewApplication::from_signal(&signal, today, ApplicationStatus::default())).await?;
//! }
//! ```
//!
//! # Modules
//!
//! - [`extractor`] - Page classification and field extraction
//! - [`watcher`] - When to run the extractor on a live page
//! - [`relay`] - Single-slot signal cache with a freshness window
//! - [`store`] - Application records over a key-value backend
//! - [`export`] - CSV export
//! - [`messaging`] - Request/response protocol between contexts
//! - [`stores`] - Backend implementations (memory, JSON file)
//! - [`traits`] - Seams to the host (page, storage, clock)
//! - [`testing`] - Mock clock, static pages and fixtures

pub mod error;
pub mod export;
pub mod extractor;
pub mod messaging;
pub mod relay;
pub mod store;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod watcher;

// Re-export core types at crate root
pub use error::{Result, TrackerError};
pub use traits::{
    clock::{Clock, SystemClock},
    page::{DocumentSource, SignalSink},
    store::{KeyValueBackend, KeyValueExt},
};
pub use types::{
    application::{ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication},
    config::{ExtractorConfig, RelayConfig},
    signal::{PageInfo, PageSignal, PageSnapshot, TabInfo},
};

pub use export::{export_csv, export_filename, CSV_MIME_TYPE};
pub use extractor::{CompanySource, Extraction, Extractor};
pub use messaging::{BackgroundContext, MessageClient, PageContext, Request, Response};
pub use relay::{CacheEntry, SignalRelay};
pub use store::ApplicationStore;
pub use stores::{JsonFileBackend, MemoryBackend};
pub use watcher::{page_events, PageEvent, PageWatcher, WatchSummary};

//! `healthdocs` - A local store for personal health document records
//!
//! Keeps metadata for uploaded health documents (name, size, category,
//! description and a content reference) as a single collection under one key
//! of a pluggable key-value backend, with first-run demo data and a CLI.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod sample;
pub mod storage;
pub mod store;
pub mod upload;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{DocumentCategory, DocumentRecord, NewDocument};
pub use storage::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use store::{DocumentStore, ListQuery, StoreStats};

//! JSON-file-backed multi-collection document store.
//!
//! A single JSON file is treated as a database: a map from collection name to
//! an ordered list of records, where a record is any JSON object carrying a
//! unique string `id`. Every operation runs a full read → parse → mutate →
//! serialize → write cycle against that file, so the file itself is the only
//! source of truth — independent handles (and independent processes) observe
//! each other's writes.
//!
//! ```rust,no_run
//! use docstore::{DocStore, Fields};
//!
//! let store = DocStore::open("db.json").unwrap();
//! let mut record = Fields::new();
//! record.insert("id".into(), "1".into());
//! record.insert("title".into(), "hello".into());
//! store.create("notes", record).unwrap();
//! assert!(store.get_by_id("notes", "1").unwrap().is_some());
//! ```
//!
//! Operations on one path are serialized through a per-path lock, so
//! concurrent calls within a process never lose writes. **Cross-process
//! mutations are not coordinated** — the atomic rename on write keeps other
//! processes from reading a torn file, but two processes mutating the same
//! record can still clobber each other. Use a real database if you need that.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod error;
mod lock;
pub mod persist;
pub mod store;

pub use error::{Error, Result};
pub use store::{Collection, DocStore, DocStoreBuilder, Fields};

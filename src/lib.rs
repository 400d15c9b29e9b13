//! # runtara-document-store
//!
//! A dynamic-schema document store on SQLite.
//!
//! Documents are maps from string keys to arbitrary values. Each document is
//! stored as one row of a single table, and the table gains a column the first
//! time a key is seen. Values are stored as JSON text.
//!
//! ## Features
//!
//! - **Schema Evolution**: Columns are added on demand and never removed
//! - **Any Key**: Keys are quoted, never rejected, so quotes, keywords and
//!   punctuation are all valid column names
//! - **Filtering**: `(column, operator, operand)` filters over a fixed operator
//!   allow-list, with every operand bound as a parameter
//! - **Upsert**: Update matching rows, or insert when nothing matched
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runtara_document_store::{DocumentStore, Document, Filter, Order, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = DocumentStore::in_memory().await?;
//!
//!     let mut doc = Document::new();
//!     doc.insert("title".to_string(), Value::from("b"));
//!     doc.insert("n".to_string(), Value::from(2));
//!     store.store(&doc).await?;
//!
//!     let found = store.get(&[Filter::eq("n", 2)], &Order::default()).await?;
//!     assert_eq!(found, vec![doc]);
//!
//!     // Pattern operands are passed raw so they are not JSON-quoted
//!     let liked = store.get(&[Filter::like("title", "%b%")], &Order::default()).await?;
//!     assert_eq!(liked.len(), 1);
//!
//!     store.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use runtara_document_store::StoreConfig;
//!
//! let config = StoreConfig::builder("data.db")
//!     .table_name("table_of_random_stuff") // Default "def"
//!     .create_if_missing(true)             // Default true
//!     .regexp(true)                        // Enable REGEXP (default)
//!     .build();
//! ```
//!
//! ## Known Limitations
//!
//! - A `Null` value is stored as SQL NULL, so it reads back as a missing key.
//! - [`Value::Opaque`] values read back as [`Value::Text`].
//! - SQLite identifiers ignore ASCII case: a key that differs from an existing
//!   column only in case fails with [`DocumentStoreError::SchemaMutation`].
//! - Update-or-insert is two statements and can race with another writer.

pub mod codec;
pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod sql;
pub mod store;
pub mod value;

// Re-export main types for convenience
pub use codec::{Operand, decode, encode};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{DocumentStoreError, Result};
pub use query::Query;
pub use schema::{ColumnSet, ROW_ID_COLUMN};
pub use sql::condition::{Direction, Filter, Operator, Order, OrderKey};
pub use store::DocumentStore;
pub use value::{Document, Value, document_from_json};

// Re-export SQL utilities for advanced users
pub use sql::condition::{build_order_by, build_where};
pub use sql::ddl::DdlGenerator;
pub use sql::dml::StatementBuilder;
pub use sql::sanitize::{check_reserved, quote_identifier};

//! `tabular-inspector` determines the shape of a large CSV or Excel file stored in a blob store
//! while reading only a small, capped number of bytes and rows.
//!
//! The primary entrypoint is [`inspector::Inspector::inspect`], which returns a
//! [`types::StructureResult`]: columns, up to three sample rows, the detected format and
//! separator, whether a header row exists, the text encoding and an approximate row count.
//! Failures are reported inside the result (`success == false` plus an
//! [`error::ErrorKind`]); the inspector never returns `Err` or panics across its boundary.
//!
//! ## What it recognizes
//!
//! - **Delimited text**: comma, semicolon or tab separated; UTF-8 or Latin-1.
//! - **Spreadsheets**: `.xlsx` (zip container) and `.xls` (compound binary), first sheet only.
//!
//! Format detection checks magic bytes first, then the key extension, then the content-type
//! reported by the store, then a plain-text heuristic over the first bytes.
//!
//! ## Quick example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tabular_inspector::inspector::Inspector;
//! use tabular_inspector::store::InMemoryStore;
//! use tabular_inspector::types::{FormatTag, Separator};
//!
//! let store = Arc::new(InMemoryStore::new());
//! store.put(
//!     "imports",
//!     "estoque.csv",
//!     "codigo;descricao;quantidade\nA1;Parafuso;10\nA2;Porca;20\n",
//!     Some("text/csv"),
//! );
//!
//! let inspector = Inspector::new(store);
//! let result = inspector.inspect("imports", "estoque.csv");
//!
//! assert!(result.success);
//! assert_eq!(result.columns, vec!["codigo", "descricao", "quantidade"]);
//! assert_eq!(result.format, FormatTag::DelimitedText(Separator::Semicolon));
//! assert!(result.has_header);
//! ```
//!
//! ## Stores
//!
//! Anything implementing [`store::ObjectStore`] can back an inspector. Provided:
//!
//! - [`store::InMemoryStore`]: objects held in memory
//! - [`store::LocalDirStore`]: `<root>/<bucket>/<key>` on the local filesystem
//! - [`store::HttpObjectStore`]: S3-compatible HTTP endpoint (HEAD + ranged GET)
//!
//! ## Modules
//!
//! - [`inspector`]: the façade, options and observers
//! - [`detection`]: format, separator, header and row-count detectors
//! - [`parsing`]: bounded delimited-text and spreadsheet parsers
//! - [`store`]: blob-store contract and implementations
//! - [`types`]: request/result value types
//! - [`error`]: error types

pub mod detection;
pub mod error;
pub mod inspector;
pub mod parsing;
pub mod store;
pub mod types;

pub use error::{ErrorKind, InspectionError, InspectionResult};
pub use inspector::{Inspector, InspectorOptions};
pub use types::{FormatTag, InspectionRequest, Separator, StructureResult};

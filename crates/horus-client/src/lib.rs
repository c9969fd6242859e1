//! Client for the Horus Health affiliate registry: bearer-token login,
//! per-document lookups, paced bulk queries, and XLSX import/export of
//! document lists and results.

pub mod client;
pub mod error;
pub mod import;
pub mod types;

pub use client::{HorusClient, LOGIN_URL, LOOKUP_URL};
pub use error::HorusError;
pub use import::{export_results, import_documents, ImportOutcome};
pub use types::{parse_document, DocumentId, DocumentType, LookupRow, LookupStatus};

//! PDF batch operations for the back-office suite.
//!
//! Every tool is a bounded, single-pass operation over a document or a
//! folder of documents: split, merge, multiply, delete pages, bulk rename,
//! and group-merge-by-prefix. Mutating tools return an [`UndoRecord`]
//! describing the files they created or moved, and [`undo`] reverses the
//! most recent one.

pub mod delete;
pub mod document;
pub mod error;
pub mod group;
pub mod merge;
pub mod multiply;
pub mod naming;
pub mod ranges;
pub mod rename;
pub mod split;
pub mod undo;

#[cfg(test)]
pub(crate) mod testutil;

pub use delete::delete_pages;
pub use document::{extract_pages, page_count, page_count_of_file};
pub use error::PdfBatchError;
pub use group::{merge_all_groups, merge_group, scan_groups, PrefixGroup, GROUP_DIR_NAME};
pub use merge::{merge_documents, merge_files};
pub use multiply::{multiply_document, MAX_COPIES};
pub use naming::{extract_prefix, natural_cmp, sanitize_file_name, unique_path};
pub use ranges::parse_page_ranges;
pub use rename::{apply_renames, plan_renames, RenameOptions};
pub use split::{split_by_ranges, split_into_pages};
pub use undo::{undo, UndoRecord, UndoReport};

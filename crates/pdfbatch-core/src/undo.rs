//! Undo records.
//!
//! Every mutating tool returns an [`UndoRecord`] describing exactly which
//! paths it created or moved. [`undo`] reverses the most recent record:
//! reversal is best-effort per file, collecting error strings instead of
//! aborting half-way, so a single vanished file does not strand the rest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PdfBatchError;
use crate::group::GROUP_DIR_NAME;
use crate::merge::merge_documents;
use crate::naming::{extract_prefix, unique_path};

/// One merged group inside a [`UndoRecord::GroupMerge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMergeEntry {
    pub key: String,
    pub output: PathBuf,
}

/// One applied rename inside a [`UndoRecord::Rename`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// What the last operation did, with enough detail to reverse it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UndoRecord {
    /// Whole-document split into per-page files.
    Split {
        original: PathBuf,
        created: Vec<PathBuf>,
        original_removed: bool,
    },
    /// Range split; the original was kept.
    SplitRanges { created: Vec<PathBuf> },
    /// Single-page document multiplied per name.
    Multiply { created: Vec<PathBuf> },
    /// Page deletion wrote a trimmed copy.
    DeletePages { created: PathBuf },
    /// Folder merge wrote one combined file.
    MergeFiles { created: PathBuf },
    /// Group merge: originals moved into the group subfolder, merged
    /// outputs written at top level.
    GroupMerge {
        folder: PathBuf,
        merges: Vec<GroupMergeEntry>,
    },
    /// Bulk rename.
    Rename { renames: Vec<RenameEntry> },
}

impl UndoRecord {
    /// Short human-readable description for prompts and logs.
    pub fn describe(&self) -> String {
        match self {
            UndoRecord::Split { created, .. } => {
                format!("split into {} files", created.len())
            }
            UndoRecord::SplitRanges { created } => {
                format!("range split into {} files", created.len())
            }
            UndoRecord::Multiply { created } => format!("{} copies", created.len()),
            UndoRecord::DeletePages { created } => {
                format!("page deletion ({})", created.display())
            }
            UndoRecord::MergeFiles { created } => format!("merge ({})", created.display()),
            UndoRecord::GroupMerge { merges, .. } => {
                format!("{} merged group(s)", merges.len())
            }
            UndoRecord::Rename { renames } => format!("{} rename(s)", renames.len()),
        }
    }
}

/// Result of reversing a record.
#[derive(Debug, Default)]
pub struct UndoReport {
    pub restored: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Reverse the given record.
pub fn undo(record: &UndoRecord) -> Result<UndoReport, PdfBatchError> {
    match record {
        UndoRecord::Split {
            original, created, ..
        } => undo_split(original, created),
        UndoRecord::SplitRanges { created } | UndoRecord::Multiply { created } => {
            Ok(remove_files(created))
        }
        UndoRecord::DeletePages { created } | UndoRecord::MergeFiles { created } => {
            Ok(remove_files(std::slice::from_ref(created)))
        }
        UndoRecord::GroupMerge { folder, merges } => Ok(undo_group_merge(folder, merges)),
        UndoRecord::Rename { renames } => Ok(undo_renames(renames)),
    }
}

/// Rebuild the original document from its page files, then delete them.
fn undo_split(original: &Path, created: &[PathBuf]) -> Result<UndoReport, PdfBatchError> {
    if created.is_empty() {
        return Ok(UndoReport::default());
    }
    if original.exists() {
        return Err(PdfBatchError::Operation(format!(
            "Original already exists, undo cancelled: {}",
            original.display()
        )));
    }

    let mut documents = Vec::with_capacity(created.len());
    for path in created {
        if !path.exists() {
            return Err(PdfBatchError::Operation(format!(
                "Missing page file: {}",
                path.display()
            )));
        }
        documents.push(std::fs::read(path)?);
    }

    let rebuilt = merge_documents(documents)?;
    std::fs::write(original, rebuilt)?;
    info!(original = %original.display(), "original rebuilt");

    let mut report = remove_files(created);
    report.restored.push(original.to_path_buf());
    Ok(report)
}

fn remove_files(paths: &[PathBuf]) -> UndoReport {
    let mut report = UndoReport::default();
    for path in paths {
        if !path.exists() {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => report.removed.push(path.clone()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not remove file");
                report
                    .errors
                    .push(format!("Could not remove '{}': {e}", path.display()));
            }
        }
    }
    report
}

/// Delete each merged output, then move the group subfolder's matching
/// files back to the parent folder.
fn undo_group_merge(folder: &Path, merges: &[GroupMergeEntry]) -> UndoReport {
    let mut report = UndoReport::default();
    let group_dir = folder.join(GROUP_DIR_NAME);

    for entry in merges {
        if entry.output.exists() {
            if let Err(e) = std::fs::remove_file(&entry.output) {
                report.errors.push(format!(
                    "Could not remove '{}': {e}",
                    entry.output.display()
                ));
                continue;
            }
            report.removed.push(entry.output.clone());
        }

        let Ok(entries) = std::fs::read_dir(&group_dir) else {
            continue;
        };
        for dir_entry in entries.flatten() {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with(&entry.key) || extract_prefix(&name) == entry.key) {
                continue;
            }
            let dst = unique_path(&folder.join(&name));
            match std::fs::rename(dir_entry.path(), &dst) {
                Ok(()) => report.restored.push(dst),
                Err(e) => report
                    .errors
                    .push(format!("Could not restore '{name}': {e}")),
            }
        }
    }

    report
}

fn undo_renames(renames: &[RenameEntry]) -> UndoReport {
    let mut report = UndoReport::default();
    for entry in renames.iter().rev() {
        if !entry.to.exists() {
            report.errors.push(format!(
                "Renamed file no longer exists: {}",
                entry.to.display()
            ));
            continue;
        }
        let dst = unique_path(&entry.from);
        match std::fs::rename(&entry.to, &dst) {
            Ok(()) => report.restored.push(dst),
            Err(e) => report.errors.push(format!(
                "Could not rename '{}' back: {e}",
                entry.to.display()
            )),
        }
    }
    report
}

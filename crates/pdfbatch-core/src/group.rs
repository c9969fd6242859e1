//! Group merge by file-name prefix.
//!
//! PDFs sharing a prefix (text before the first dot or whitespace) form a
//! group. Merging a group first moves its members into the `Groups/`
//! subfolder, then writes the combined document as `{key}.pdf` at the top
//! level. The subfolder is what makes the operation reversible: undo deletes
//! the merged output and moves the matching files back.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::load_bytes;
use crate::error::PdfBatchError;
use crate::merge::merge_documents;
use crate::naming::{extract_prefix, natural_cmp, unique_path};
use crate::undo::{GroupMergeEntry, UndoRecord};

/// Subfolder holding the originals of merged groups.
pub const GROUP_DIR_NAME: &str = "Groups";

/// A prefix group: the shared key and its member file names, both in
/// natural order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroup {
    pub key: String,
    pub files: Vec<String>,
}

/// Scan a folder for prefix groups with more than one member.
pub fn scan_groups(folder: &Path) -> Result<Vec<PrefixGroup>, PdfBatchError> {
    let mut names: Vec<String> = std::fs::read_dir(folder)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .collect();
    names.sort_by(|a, b| natural_cmp(a, b));

    let mut groups: Vec<PrefixGroup> = Vec::new();
    for name in names {
        let key = extract_prefix(&name);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.files.push(name),
            None => groups.push(PrefixGroup {
                key: key.to_string(),
                files: vec![name],
            }),
        }
    }

    groups.retain(|g| g.files.len() > 1);
    groups.sort_by(|a, b| natural_cmp(&a.key, &b.key));
    Ok(groups)
}

/// Result of merging one group. `output` is set whenever a combined file
/// was written; `errors` lists the members that could not be processed.
#[derive(Debug)]
pub struct GroupMergeOutcome {
    pub key: String,
    pub output: Option<PathBuf>,
    pub errors: Vec<String>,
    pub record: Option<UndoRecord>,
}

impl GroupMergeOutcome {
    pub fn success(&self) -> bool {
        self.output.is_some() && self.errors.is_empty()
    }
}

/// Merge one group: move the members into `Groups/`, then concatenate them
/// in natural order into `{key}.pdf`. Unreadable members are reported and
/// skipped rather than aborting the group.
pub fn merge_group(
    folder: &Path,
    key: &str,
    files: &[String],
) -> Result<GroupMergeOutcome, PdfBatchError> {
    let mut errors = Vec::new();
    let group_dir = folder.join(GROUP_DIR_NAME);
    std::fs::create_dir_all(&group_dir)?;

    let mut moved: Vec<PathBuf> = Vec::new();
    for name in files {
        let src = folder.join(name);
        if !src.exists() {
            errors.push(format!("Missing file: {name}"));
            continue;
        }
        let dst = unique_path(&group_dir.join(name));
        match std::fs::rename(&src, &dst) {
            Ok(()) => moved.push(dst),
            Err(e) => errors.push(format!("Could not move '{name}': {e}")),
        }
    }

    if moved.is_empty() {
        return Ok(GroupMergeOutcome {
            key: key.to_string(),
            output: None,
            errors,
            record: None,
        });
    }

    moved.sort_by(|a, b| {
        natural_cmp(
            &a.file_name().unwrap_or_default().to_string_lossy(),
            &b.file_name().unwrap_or_default().to_string_lossy(),
        )
    });

    let mut documents = Vec::with_capacity(moved.len());
    for path in &moved {
        let name = path.file_name().unwrap_or_default().to_string_lossy().into_owned();
        match std::fs::read(path).map_err(PdfBatchError::from).and_then(|bytes| {
            load_bytes(&bytes)?;
            Ok(bytes)
        }) {
            Ok(bytes) => documents.push(bytes),
            Err(e) => errors.push(format!("Could not add '{name}': {e}")),
        }
    }

    if documents.is_empty() {
        errors.push("No valid PDFs in the group".to_string());
        return Ok(GroupMergeOutcome {
            key: key.to_string(),
            output: None,
            errors,
            record: None,
        });
    }

    let output = unique_path(&folder.join(format!("{key}.pdf")));
    match merge_documents(documents) {
        Ok(merged) => {
            std::fs::write(&output, merged)?;
            info!(key, output = %output.display(), "group merged");
            let record = UndoRecord::GroupMerge {
                folder: folder.to_path_buf(),
                merges: vec![GroupMergeEntry {
                    key: key.to_string(),
                    output: output.clone(),
                }],
            };
            Ok(GroupMergeOutcome {
                key: key.to_string(),
                output: Some(output),
                errors,
                record: Some(record),
            })
        }
        Err(e) => {
            errors.push(format!("Could not write '{}': {e}", output.display()));
            warn!(key, "group merge failed");
            Ok(GroupMergeOutcome {
                key: key.to_string(),
                output: None,
                errors,
                record: None,
            })
        }
    }
}

/// Result of merging every group in a folder.
#[derive(Debug)]
pub struct MergeAllOutcome {
    pub merged: Vec<GroupMergeEntry>,
    pub total_groups: usize,
    pub errors: Vec<String>,
    pub record: Option<UndoRecord>,
}

/// Merge every group found in the folder, collecting per-group errors
/// without aborting the batch.
pub fn merge_all_groups(folder: &Path) -> Result<MergeAllOutcome, PdfBatchError> {
    let groups = scan_groups(folder)?;
    let total_groups = groups.len();

    let mut merged = Vec::new();
    let mut errors = Vec::new();

    for group in groups {
        let outcome = merge_group(folder, &group.key, &group.files)?;
        errors.extend(outcome.errors);
        if let Some(output) = outcome.output {
            merged.push(GroupMergeEntry {
                key: outcome.key,
                output,
            });
        }
    }

    let record = if merged.is_empty() {
        None
    } else {
        Some(UndoRecord::GroupMerge {
            folder: folder.to_path_buf(),
            merges: merged.clone(),
        })
    };

    Ok(MergeAllOutcome {
        merged,
        total_groups,
        errors,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::page_count;
    use crate::testutil::pdf_with_pages;

    fn seed(dir: &Path, name: &str, pages: u32) {
        std::fs::write(dir.join(name), pdf_with_pages(pages)).unwrap();
    }

    #[test]
    fn test_scan_excludes_singletons() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A.pdf", 1);
        seed(dir.path(), "A 2.pdf", 1);
        seed(dir.path(), "B.pdf", 1);

        let groups = scan_groups(dir.path()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "A");
        // Space sorts before dot, so the numbered member leads.
        assert_eq!(groups[0].files, vec!["A 2.pdf", "A.pdf"]);
    }

    #[test]
    fn test_scan_orders_members_naturally() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "INV 10.pdf", 1);
        seed(dir.path(), "INV 2.pdf", 1);
        seed(dir.path(), "INV.pdf", 1);

        let groups = scan_groups(dir.path()).unwrap();
        assert_eq!(groups[0].files, vec!["INV 2.pdf", "INV 10.pdf", "INV.pdf"]);
    }

    #[test]
    fn test_scan_ignores_non_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A.pdf", 1);
        seed(dir.path(), "A 2.pdf", 1);
        std::fs::write(dir.path().join("A 3.txt"), b"x").unwrap();

        let groups = scan_groups(dir.path()).unwrap();
        assert_eq!(groups[0].files.len(), 2);
    }

    #[test]
    fn test_merge_group_moves_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A.pdf", 2);
        seed(dir.path(), "A 2.pdf", 3);

        let outcome = merge_group(
            dir.path(),
            "A",
            &["A.pdf".to_string(), "A 2.pdf".to_string()],
        )
        .unwrap();

        assert!(outcome.success());
        let output = outcome.output.unwrap();
        assert_eq!(page_count(&std::fs::read(&output).unwrap()).unwrap(), 5);
        // Originals moved into the group subfolder.
        assert!(dir.path().join(GROUP_DIR_NAME).join("A.pdf").exists());
        assert!(dir.path().join(GROUP_DIR_NAME).join("A 2.pdf").exists());
        assert!(!dir.path().join("A 2.pdf").exists());
    }

    #[test]
    fn test_merge_group_output_collision_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A 1.pdf", 1);
        seed(dir.path(), "A 2.pdf", 1);
        std::fs::write(dir.path().join("A.pdf"), b"taken").unwrap();

        let outcome = merge_group(
            dir.path(),
            "A",
            &["A 1.pdf".to_string(), "A 2.pdf".to_string()],
        )
        .unwrap();

        assert_eq!(outcome.output.unwrap(), dir.path().join("A (1).pdf"));
    }

    #[test]
    fn test_merge_group_skips_unreadable_member() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A 1.pdf", 2);
        std::fs::write(dir.path().join("A 2.pdf"), b"not a pdf").unwrap();

        let outcome = merge_group(
            dir.path(),
            "A",
            &["A 1.pdf".to_string(), "A 2.pdf".to_string()],
        )
        .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.errors.len(), 1);
        let output = outcome.output.unwrap();
        assert_eq!(page_count(&std::fs::read(&output).unwrap()).unwrap(), 2);
    }

    #[test]
    fn test_merge_all_collects_per_group_results() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "A.pdf", 1);
        seed(dir.path(), "A 2.pdf", 1);
        seed(dir.path(), "B.pdf", 1);
        seed(dir.path(), "B 2.pdf", 1);

        let outcome = merge_all_groups(dir.path()).unwrap();
        assert_eq!(outcome.total_groups, 2);
        assert_eq!(outcome.merged.len(), 2);
        assert!(outcome.errors.is_empty());
        assert!(outcome.record.is_some());
    }
}

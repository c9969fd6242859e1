//! Bulk rename of a folder's PDF files by literal or regex pattern.

use std::path::Path;

use regex::RegexBuilder;
use tracing::info;

use crate::error::PdfBatchError;
use crate::naming::unique_path;
use crate::undo::{RenameEntry, UndoRecord};

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub pattern: String,
    pub replacement: String,
    pub use_regex: bool,
    pub case_sensitive: bool,
}

/// One planned rename, file names only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct RenameOutcome {
    pub applied: Vec<RenameEntry>,
    pub errors: Vec<String>,
    pub record: Option<UndoRecord>,
}

/// Compute the renames the options would produce, skipping files whose
/// name does not change. An empty pattern plans nothing.
pub fn plan_renames(
    folder: &Path,
    options: &RenameOptions,
) -> Result<Vec<PlannedRename>, PdfBatchError> {
    if options.pattern.is_empty() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = std::fs::read_dir(folder)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .collect();
    names.sort_by_key(|name| name.to_lowercase());

    let mut planned = Vec::new();
    for name in names {
        let new_name = compute_new_name(&name, options)?;
        if new_name != name {
            planned.push(PlannedRename {
                from: name,
                to: new_name,
            });
        }
    }
    Ok(planned)
}

/// Apply a rename plan. Targets that would collide get a numeric suffix;
/// per-file failures are collected, not fatal.
pub fn apply_renames(folder: &Path, planned: &[PlannedRename]) -> RenameOutcome {
    let mut applied = Vec::new();
    let mut errors = Vec::new();

    for item in planned {
        let src = folder.join(&item.from);
        if !src.exists() {
            errors.push(format!("Missing file: {}", item.from));
            continue;
        }
        let dst = unique_path(&folder.join(&item.to));
        match std::fs::rename(&src, &dst) {
            Ok(()) => {
                info!(from = %item.from, to = %dst.display(), "renamed");
                applied.push(RenameEntry { from: src, to: dst });
            }
            Err(e) => errors.push(format!("Could not rename '{}': {e}", item.from)),
        }
    }

    let record = if applied.is_empty() {
        None
    } else {
        Some(UndoRecord::Rename {
            renames: applied.clone(),
        })
    };

    RenameOutcome {
        applied,
        errors,
        record,
    }
}

/// The pattern applies to the file stem; the extension is preserved.
fn compute_new_name(file_name: &str, options: &RenameOptions) -> Result<String, PdfBatchError> {
    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) => (&file_name[..idx], &file_name[idx..]),
        None => (file_name, ""),
    };

    let new_stem = if options.use_regex {
        let re = RegexBuilder::new(&options.pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| PdfBatchError::Pattern(e.to_string()))?;
        re.replace_all(stem, options.replacement.as_str()).into_owned()
    } else if options.case_sensitive {
        stem.replace(&options.pattern, &options.replacement)
    } else {
        let re = RegexBuilder::new(&regex::escape(&options.pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| PdfBatchError::Pattern(e.to_string()))?;
        re.replace_all(stem, options.replacement.as_str()).into_owned()
    };

    Ok(format!("{new_stem}{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pattern: &str, replacement: &str, use_regex: bool, case_sensitive: bool) -> RenameOptions {
        RenameOptions {
            pattern: pattern.into(),
            replacement: replacement.into(),
            use_regex,
            case_sensitive,
        }
    }

    #[test]
    fn test_literal_replacement() {
        let name = compute_new_name("FACT 2024.pdf", &options("FACT", "INV", false, true)).unwrap();
        assert_eq!(name, "INV 2024.pdf");
    }

    #[test]
    fn test_literal_case_insensitive() {
        let name = compute_new_name("fact 2024.pdf", &options("FACT", "INV", false, false)).unwrap();
        assert_eq!(name, "INV 2024.pdf");
    }

    #[test]
    fn test_regex_replacement_keeps_extension() {
        let name =
            compute_new_name("scan_0012.pdf", &options(r"^scan_0*", "", true, true)).unwrap();
        assert_eq!(name, "12.pdf");
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        assert!(compute_new_name("a.pdf", &options("(", "", true, true)).is_err());
    }

    #[test]
    fn test_plan_skips_unchanged_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("keep.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("FACT 1.pdf"), b"x").unwrap();

        let planned = plan_renames(dir.path(), &options("FACT", "INV", false, true)).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].to, "INV 1.pdf");
    }

    #[test]
    fn test_apply_resolves_collisions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("FACT 1.pdf"), b"a").unwrap();
        std::fs::write(dir.path().join("INV 1.pdf"), b"b").unwrap();

        let planned = plan_renames(dir.path(), &options("FACT", "INV", false, true)).unwrap();
        let outcome = apply_renames(dir.path(), &planned);

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied[0].to, dir.path().join("INV 1 (1).pdf"));
        assert!(dir.path().join("INV 1.pdf").exists());
    }
}

//! Whole-document and range splits.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::{extract_pages, page_count};
use crate::error::PdfBatchError;
use crate::naming::{sanitize_file_name, unique_path};
use crate::ranges::parse_page_ranges;
use crate::undo::UndoRecord;

/// Files produced by a split, plus the record needed to reverse it.
#[derive(Debug)]
pub struct SplitOutcome {
    pub created: Vec<PathBuf>,
    pub original_removed: bool,
    pub record: UndoRecord,
}

/// Split every page of `pdf_path` into its own file.
///
/// With `names`, each page gets `prefix_name` (one name per page — a count
/// mismatch is an error); without, pages become `page_N`. The original file
/// is removed afterwards; failure to remove it is logged, not fatal, and
/// recorded so undo knows whether a rebuild is due.
pub fn split_into_pages(
    pdf_path: &Path,
    output_dir: Option<&Path>,
    prefix: &str,
    names: Option<&[String]>,
) -> Result<SplitOutcome, PdfBatchError> {
    let bytes = std::fs::read(pdf_path)?;
    let total = page_count(&bytes)?;

    if let Some(names) = names {
        if names.len() != total {
            return Err(PdfBatchError::NameCount {
                expected: total,
                got: names.len(),
            });
        }
    }

    let output_dir = resolve_output_dir(pdf_path, output_dir)?;
    let mut created = Vec::with_capacity(total);

    for i in 0..total {
        let default_name = format!("page_{}", i + 1);
        let file_name = match names {
            Some(names) => {
                let body = strip_pasted_prefix(names[i].trim(), prefix);
                let full = if prefix.is_empty() {
                    body.to_string()
                } else {
                    format!("{prefix}_{body}")
                };
                sanitize_file_name(&full, &default_name)
            }
            None => default_name.clone(),
        };

        let out_path = unique_path(&output_dir.join(format!("{file_name}.pdf")));
        let page = extract_pages(&bytes, &[i])?;
        std::fs::write(&out_path, page)?;
        info!(page = i + 1, total, path = %out_path.display(), "page written");
        created.push(out_path);
    }

    let original_removed = match std::fs::remove_file(pdf_path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %pdf_path.display(), error = %e, "could not remove original");
            false
        }
    };

    Ok(SplitOutcome {
        record: UndoRecord::Split {
            original: pdf_path.to_path_buf(),
            created: created.clone(),
            original_removed,
        },
        created,
        original_removed,
    })
}

/// Split the pages selected by a range expression into `{stem}_page_{n}.pdf`
/// files. The original file is kept.
pub fn split_by_ranges(
    pdf_path: &Path,
    output_dir: Option<&Path>,
    ranges: &str,
) -> Result<SplitOutcome, PdfBatchError> {
    let bytes = std::fs::read(pdf_path)?;
    let total = page_count(&bytes)?;
    let indices = parse_page_ranges(ranges, total)?;

    let output_dir = resolve_output_dir(pdf_path, output_dir)?;
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());

    let mut created = Vec::with_capacity(indices.len());
    for &idx in &indices {
        let out_path = unique_path(&output_dir.join(format!("{stem}_page_{}.pdf", idx + 1)));
        let page = extract_pages(&bytes, &[idx])?;
        std::fs::write(&out_path, page)?;
        created.push(out_path);
    }

    Ok(SplitOutcome {
        record: UndoRecord::SplitRanges {
            created: created.clone(),
        },
        created,
        original_removed: false,
    })
}

fn resolve_output_dir(
    pdf_path: &Path,
    output_dir: Option<&Path>,
) -> Result<PathBuf, PdfBatchError> {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => pdf_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// If the operator pasted the full `prefix_body` into the name field, keep
/// only the body.
fn strip_pasted_prefix<'a>(body: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return body;
    }
    match body.split_once('_') {
        Some((head, rest)) if head == prefix => rest,
        _ => body,
    }
}

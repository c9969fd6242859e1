//! Remove selected pages from a document.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::{extract_pages, page_count};
use crate::error::PdfBatchError;
use crate::naming::unique_path;
use crate::ranges::parse_page_ranges;
use crate::undo::UndoRecord;

#[derive(Debug)]
pub struct DeleteOutcome {
    pub output: PathBuf,
    pub kept_pages: usize,
    pub record: UndoRecord,
}

/// Write a copy of `pdf_path` without the pages selected by `ranges`.
///
/// Deleting every page is rejected. The default output name is
/// `{stem}_edited.pdf` beside the original; collisions get a numeric
/// suffix. The original file is untouched.
pub fn delete_pages(
    pdf_path: &Path,
    ranges: &str,
    output_dir: Option<&Path>,
    output_name: Option<&str>,
) -> Result<DeleteOutcome, PdfBatchError> {
    let bytes = std::fs::read(pdf_path)?;
    let total = page_count(&bytes)?;
    let to_delete = parse_page_ranges(ranges, total)?;

    if to_delete.is_empty() {
        return Err(PdfBatchError::InvalidRange(
            "No pages selected for deletion".into(),
        ));
    }
    if to_delete.len() == total {
        return Err(PdfBatchError::Operation(
            "Cannot delete every page, at least one must remain".into(),
        ));
    }

    let keep: Vec<usize> = (0..total).filter(|i| !to_delete.contains(i)).collect();
    let trimmed = extract_pages(&bytes, &keep)?;

    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    let name = match output_name {
        Some(name) => name.trim_end_matches(".pdf").to_string(),
        None => format!("{stem}_edited"),
    };
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => pdf_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir)?;

    let output = unique_path(&dir.join(format!("{name}.pdf")));
    std::fs::write(&output, trimmed)?;
    info!(output = %output.display(), kept = keep.len(), deleted = to_delete.len(), "pages deleted");

    Ok(DeleteOutcome {
        record: UndoRecord::DeletePages {
            created: output.clone(),
        },
        kept_pages: keep.len(),
        output,
    })
}

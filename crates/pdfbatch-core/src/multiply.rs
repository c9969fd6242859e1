//! Multiply a single-page document once per provided name.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::page_count;
use crate::error::PdfBatchError;
use crate::naming::{sanitize_file_name, unique_path};
use crate::undo::UndoRecord;

/// Upper bound on copies per run.
pub const MAX_COPIES: usize = 10;

#[derive(Debug)]
pub struct MultiplyOutcome {
    pub created: Vec<PathBuf>,
    pub record: UndoRecord,
}

/// Copy a one-page PDF once per name as `{prefix}{name}.pdf`. The original
/// is kept.
pub fn multiply_document(
    pdf_path: &Path,
    output_dir: Option<&Path>,
    prefix: &str,
    names: &[String],
) -> Result<MultiplyOutcome, PdfBatchError> {
    if names.is_empty() {
        return Err(PdfBatchError::Operation("No names provided".into()));
    }
    if names.len() > MAX_COPIES {
        return Err(PdfBatchError::Operation(format!(
            "At most {MAX_COPIES} names allowed, got {}",
            names.len()
        )));
    }

    let bytes = std::fs::read(pdf_path)?;
    let total = page_count(&bytes)?;
    if total != 1 {
        return Err(PdfBatchError::Operation(format!(
            "The PDF must have exactly 1 page, this one has {total}"
        )));
    }

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => pdf_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&output_dir)?;

    let mut created = Vec::with_capacity(names.len());
    for name in names {
        let clean = sanitize_file_name(name.trim(), "copy");
        let out_path = unique_path(&output_dir.join(format!("{prefix}{clean}.pdf")));
        std::fs::write(&out_path, &bytes)?;
        info!(path = %out_path.display(), "copy written");
        created.push(out_path);
    }

    Ok(MultiplyOutcome {
        record: UndoRecord::Multiply {
            created: created.clone(),
        },
        created,
    })
}

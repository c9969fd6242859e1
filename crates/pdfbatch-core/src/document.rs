//! Low-level lopdf document helpers used by every tool.

use std::collections::HashSet;
use std::path::Path;

use lopdf::Document;

use crate::error::PdfBatchError;

pub(crate) fn load_bytes(bytes: &[u8]) -> Result<Document, PdfBatchError> {
    Document::load_mem(bytes).map_err(|e| PdfBatchError::Parse(e.to_string()))
}

pub(crate) fn load_file(path: &Path) -> Result<Document, PdfBatchError> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

pub(crate) fn save_to_vec(doc: &mut Document) -> Result<Vec<u8>, PdfBatchError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfBatchError::Operation(format!("Save failed: {e}")))?;
    Ok(buffer)
}

/// Number of pages in a PDF held in memory.
pub fn page_count(bytes: &[u8]) -> Result<usize, PdfBatchError> {
    Ok(load_bytes(bytes)?.get_pages().len())
}

/// Number of pages in a PDF on disk.
pub fn page_count_of_file(path: &Path) -> Result<usize, PdfBatchError> {
    Ok(load_file(path)?.get_pages().len())
}

/// Build a new document containing exactly the selected zero-based pages,
/// in document order. Everything unreachable from the kept pages is pruned.
pub fn extract_pages(bytes: &[u8], indices: &[usize]) -> Result<Vec<u8>, PdfBatchError> {
    if indices.is_empty() {
        return Err(PdfBatchError::InvalidRange("No pages selected".into()));
    }

    let doc = load_bytes(bytes)?;
    let total = doc.get_pages().len();

    if let Some(&bad) = indices.iter().find(|&&i| i >= total) {
        return Err(PdfBatchError::InvalidRange(format!(
            "Page {} does not exist (document has {total} pages)",
            bad + 1
        )));
    }

    let keep: HashSet<u32> = indices.iter().map(|&i| i as u32 + 1).collect();
    let mut new_doc = doc;

    // Page numbers shift as pages disappear, so drop from the back.
    let drop_list: Vec<u32> = (1..=total as u32).rev().filter(|n| !keep.contains(n)).collect();
    for page in drop_list {
        new_doc.delete_pages(&[page]);
    }

    new_doc.prune_objects();
    new_doc.compress();
    save_to_vec(&mut new_doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::pdf_with_pages;

    #[test]
    fn test_page_count() {
        let pdf = pdf_with_pages(4);
        assert_eq!(page_count(&pdf).unwrap(), 4);
    }

    #[test]
    fn test_page_count_rejects_garbage() {
        assert!(page_count(b"not a pdf").is_err());
    }

    #[test]
    fn test_extract_single_page() {
        let pdf = pdf_with_pages(5);
        let out = extract_pages(&pdf, &[2]).unwrap();
        assert_eq!(page_count(&out).unwrap(), 1);
    }

    #[test]
    fn test_extract_subset_keeps_count() {
        let pdf = pdf_with_pages(10);
        let out = extract_pages(&pdf, &[0, 4, 9]).unwrap();
        assert_eq!(page_count(&out).unwrap(), 3);
    }

    #[test]
    fn test_extract_out_of_range_fails() {
        let pdf = pdf_with_pages(3);
        assert!(extract_pages(&pdf, &[3]).is_err());
    }

    #[test]
    fn test_extract_empty_selection_fails() {
        let pdf = pdf_with_pages(3);
        assert!(extract_pages(&pdf, &[]).is_err());
    }
}

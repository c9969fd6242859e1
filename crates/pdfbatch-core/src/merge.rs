//! PDF merge.
//!
//! Concatenates documents page by page into a freshly built destination:
//! every source's objects are renumbered past the destination's current
//! ceiling, then a new page tree and catalog are written over the combined
//! object set. Leftover source catalogs are pruned before saving.

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::document::{load_bytes, save_to_vec};
use crate::error::PdfBatchError;
use crate::naming::unique_path;
use crate::undo::UndoRecord;

/// Merge documents in input order into a single PDF.
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>, PdfBatchError> {
    if documents.is_empty() {
        return Err(PdfBatchError::Operation("No documents to merge".into()));
    }
    if documents.len() == 1 {
        return Ok(documents.into_iter().next().unwrap());
    }

    let mut dest = Document::with_version("1.5");
    let mut page_refs: Vec<ObjectId> = Vec::new();

    for (idx, bytes) in documents.iter().enumerate() {
        let source = load_bytes(bytes)
            .map_err(|e| PdfBatchError::Parse(format!("Document {idx}: {e}")))?;
        append_document(&mut dest, source, &mut page_refs);
    }

    let pages_id = dest.new_object_id();
    for &page_ref in &page_refs {
        if let Some(Object::Dictionary(page)) = dest.objects.get_mut(&page_ref) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_refs.len() as i64));
    pages.set(
        "Kids",
        Object::Array(page_refs.iter().map(|&id| Object::Reference(id)).collect()),
    );
    dest.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = dest.add_object(catalog);
    dest.trailer.set("Root", Object::Reference(catalog_id));

    dest.prune_objects();
    dest.compress();
    save_to_vec(&mut dest)
}

/// Move a source document's objects into `dest` with shifted IDs and record
/// its page references in reading order.
fn append_document(dest: &mut Document, source: Document, page_refs: &mut Vec<ObjectId>) {
    let offset = dest.max_id;
    let source_max = source.max_id;
    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();

    for (old_id, object) in source.objects.into_iter() {
        dest.objects
            .insert((old_id.0 + offset, old_id.1), shift_refs(object, offset));
    }
    for page_id in source_pages {
        page_refs.push((page_id.0 + offset, page_id.1));
    }

    dest.max_id = offset + source_max;
}

fn shift_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference((num, gen)) => Object::Reference((num + offset, gen)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|o| shift_refs(o, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Outcome of a filesystem-level merge.
#[derive(Debug)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub record: UndoRecord,
}

/// Merge at least two files into `output` (suffixed if the path is taken).
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<MergeOutcome, PdfBatchError> {
    if inputs.len() < 2 {
        return Err(PdfBatchError::Operation(
            "Select at least two PDF files to merge".into(),
        ));
    }

    let mut documents = Vec::with_capacity(inputs.len());
    for path in inputs {
        documents.push(std::fs::read(path)?);
    }

    let merged = merge_documents(documents)?;
    let output = unique_path(output);
    std::fs::write(&output, merged)?;
    debug!(output = %output.display(), sources = inputs.len(), "merged files");

    Ok(MergeOutcome {
        record: UndoRecord::MergeFiles {
            created: output.clone(),
        },
        output,
    })
}

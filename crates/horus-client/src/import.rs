//! Document-list import and result export.
//!
//! Upload sheets carry the document type in column C and the number in
//! column D, data starting at row 3; the two are concatenated into the
//! `TYPE+NUMBER` form the API takes.

use std::collections::HashSet;
use std::path::Path;

use roster_core::xlsx::{read_sheet, write_styled_sheet};
use tracing::info;

use crate::error::HorusError;
use crate::types::LookupRow;

pub const EXPORT_HEADERS: [&str; 5] = ["Tipo Doc", "Número", "Nombre", "Estado", "IPS"];

#[derive(Debug)]
pub struct ImportOutcome {
    /// Newly imported identifiers, input order preserved.
    pub loaded: Vec<String>,
    /// Values dropped as duplicates of the file or of `existing`.
    pub skipped: usize,
}

/// Read document identifiers from an upload sheet, skipping blanks and
/// anything already in `existing`.
pub fn import_documents(path: &Path, existing: &[String]) -> Result<ImportOutcome, HorusError> {
    let (_headers, rows) = read_sheet(path)?;

    let mut seen: HashSet<String> = existing.iter().map(|d| d.trim().to_string()).collect();
    let mut loaded = Vec::new();
    let mut skipped = 0;

    // read_sheet's data starts at sheet row 2; documents start at row 3.
    for row in rows.iter().skip(1) {
        let type_part = row.get(2).map(String::as_str).unwrap_or_default();
        let number_part = row.get(3).map(String::as_str).unwrap_or_default();
        let value = format!("{}{}", type_part.trim(), number_part.trim());
        if value.is_empty() {
            continue;
        }
        if seen.contains(&value) {
            skipped += 1;
        } else {
            seen.insert(value.clone());
            loaded.push(value);
        }
    }

    info!(file = %path.display(), loaded = loaded.len(), skipped, "documents imported");
    Ok(ImportOutcome { loaded, skipped })
}

/// Write lookup results as the five-column report sheet.
pub fn export_results(path: &Path, rows: &[LookupRow]) -> Result<(), HorusError> {
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let [document, name, status, ips] = row.columns();
            let tipo: String = document
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_uppercase();
            let numero: String = document.chars().filter(|c| c.is_ascii_digit()).collect();
            vec![tipo, numero, name, status, ips]
        })
        .collect();

    write_styled_sheet(
        path,
        "Afiliados",
        &EXPORT_HEADERS,
        &data,
        &[],
        &[("Número", 15.0), ("Nombre", 35.0), ("Estado", 18.0), ("IPS", 25.0)],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LookupStatus;
    use rust_xlsxwriter::Workbook;

    fn write_upload_sheet(path: &Path, rows: &[(&str, &str)]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Detalle de carga").unwrap();
        // Row 2 is a sub-header line; data starts at row 3.
        worksheet.write_string(1, 2, "Tipo").unwrap();
        worksheet.write_string(1, 3, "Número").unwrap();
        for (idx, (tipo, numero)) in rows.iter().enumerate() {
            worksheet.write_string((idx + 2) as u32, 2, *tipo).unwrap();
            worksheet.write_string((idx + 2) as u32, 3, *numero).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_import_concatenates_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carga.xlsx");
        write_upload_sheet(
            &path,
            &[("CC", "100"), ("CC", "100"), ("TI", "200"), ("", "")],
        );

        let outcome = import_documents(&path, &[]).unwrap();
        assert_eq!(outcome.loaded, vec!["CC100", "TI200"]);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_import_skips_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carga.xlsx");
        write_upload_sheet(&path, &[("CC", "100"), ("TI", "200")]);

        let outcome = import_documents(&path, &["CC100".to_string()]).unwrap();
        assert_eq!(outcome.loaded, vec!["TI200"]);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_export_splits_document_into_type_and_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resultado.xlsx");

        let rows = vec![
            LookupRow {
                document: "CC100".into(),
                status: LookupStatus::Found {
                    name: "ANA GARCÍA".into(),
                    status: "ACTIVO".into(),
                    ips: "IPS NORTE".into(),
                },
            },
            LookupRow {
                document: "XX9".into(),
                status: LookupStatus::InvalidFormat,
            },
        ];
        export_results(&path, &rows).unwrap();

        let (headers, data) = read_sheet(&path).unwrap();
        assert_eq!(headers, EXPORT_HEADERS.to_vec());
        assert_eq!(data[0], vec!["CC", "100", "ANA GARCÍA", "ACTIVO", "IPS NORTE"]);
        assert_eq!(data[1][0], "XX");
        assert_eq!(data[1][2], "REVISAR (formato inválido)");
    }
}

//! End-to-end spreadsheet flows: build an input workbook, run the tool,
//! read the result back.

use std::collections::HashMap;
use std::path::Path;

use roster_core::carnet::{transform, VaccineInputs};
use roster_core::email::{validate_workbook, EmailIssueKind};
use roster_core::mx::MxLookup;
use roster_core::xlsx::read_sheet;
use rust_xlsxwriter::Workbook;

struct AllowList(&'static [&'static str]);

impl MxLookup for AllowList {
    fn has_mx(&self, domain: &str) -> bool {
        self.0.contains(&domain)
    }
}

fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, *value)
                .unwrap();
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn email_validation_reports_rows_and_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.xlsx");
    write_workbook(
        &path,
        &["Nombre", "Correo"],
        &[
            vec!["Ana", "ana@example.com"],
            vec!["Luis", "luis-at-example.com"],
            vec!["María", "maría@example.com"],
            vec!["Pedro", "pedro@unknown.invalid"],
            vec!["Vacío", ""],
        ],
    );

    let report = validate_workbook(&path, &AllowList(&["example.com"])).unwrap();

    assert_eq!(report.total, 5);
    assert_eq!(report.issues.len(), 3);
    assert_eq!(report.valid(), 2);

    // Rows are 1-based with the header on row 1.
    assert_eq!(report.issues[0].row, 3);
    assert_eq!(report.issues[0].kind, EmailIssueKind::Format);
    assert_eq!(report.issues[1].row, 4);
    assert_eq!(report.issues[1].kind, EmailIssueKind::Characters);
    assert_eq!(report.issues[2].row, 5);
    assert_eq!(report.issues[2].kind, EmailIssueKind::Domain);
}

#[test]
fn email_validation_without_email_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.xlsx");
    write_workbook(&path, &["Nombre", "Telefono"], &[vec!["Ana", "300123"]]);

    let err = validate_workbook(&path, &AllowList(&[])).unwrap_err();
    assert!(err.to_string().contains("Telefono"));
}

#[test]
fn carnet_transform_produces_registry_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("atenciones.xlsx");
    write_workbook(
        &input,
        &[
            "Fecha de Atención",
            "Tipo de Documento",
            "Número de Documento",
            "Primer Nombre",
            "Primer Apellido",
            "Sexo",
            "Nombre de la Vacuna",
        ],
        &[
            vec![
                "05/08/2026",
                "CC",
                "1.002.003",
                "maría",
                "garcía",
                "FEMENINO",
                "INFLUENZA - VPH",
            ],
            vec![
                "05/08/2026",
                "TI",
                "99.001",
                "luis",
                "lopez",
                "MASCULINO",
                "influenza",
            ],
        ],
    );

    let mut inputs = HashMap::new();
    inputs.insert(
        "INFLUVAC".to_string(),
        VaccineInputs {
            lot: "K17".into(),
            expiry: "1/12/2026".into(),
        },
    );
    inputs.insert(
        "VPH".to_string(),
        VaccineInputs {
            lot: "Y000435".into(),
            expiry: "01/06/2027".into(),
        },
    );

    let summary = transform(&input, None, &inputs).unwrap();

    assert_eq!(summary.patients, 2);
    assert_eq!(summary.applications, 3);
    assert!(summary
        .output
        .file_name()
        .unwrap()
        .to_string_lossy()
        .contains("DIA 5 AGO"));

    let (headers, rows) = read_sheet(&summary.output).unwrap();
    assert_eq!(headers.len(), 36);
    assert_eq!(rows.len(), 3);

    let documento = headers.iter().position(|h| h == "documento").unwrap();
    let biologico = headers.iter().position(|h| h == "biologico").unwrap();
    let nota = headers.iter().position(|h| h == "nota_enfermeria").unwrap();
    let sexo = headers.iter().position(|h| h == "sexo").unwrap();

    assert_eq!(rows[0][documento], "1002003");
    assert_eq!(rows[0][biologico], "INFLUVAC");
    assert_eq!(rows[0][sexo], "MUJER");
    assert!(rows[0][nota].contains("lote K17"));
    assert!(rows[0][nota].contains("01/12/2026"));
    assert_eq!(rows[1][biologico], "GARDASIL 9");
    assert_eq!(rows[2][sexo], "HOMBRE");
}

#[test]
fn carnet_transform_requires_lot_and_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("atenciones.xlsx");
    write_workbook(
        &input,
        &["Nombre de la Vacuna"],
        &[vec!["INFLUENZA"]],
    );

    let err = transform(&input, None, &HashMap::new()).unwrap_err();
    assert!(err.to_string().contains("INFLUVAC"));
}

//! Vaccination record transformation ("carnet virtual").
//!
//! Takes the raw attention sheet exported by the clinic platform and
//! produces the registry upload: one output row per recognized biological
//! per patient, with the operator-supplied lot/expiry, normalized arm,
//! fixed municipality defaults, and a generated nursing note. Output
//! values stay in Spanish — the registry consumes them verbatim.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::catalog::{identify, Vaccine};
use crate::error::RosterError;
use crate::xlsx::{read_sheet, write_styled_sheet};

pub const OUTPUT_COLUMNS: [&str; 36] = [
    "fecha_vacunacion",
    "tipo_documento",
    "documento",
    "fecha_nacimiento",
    "sexo",
    "primer_apellido",
    "segundo_apellido",
    "nombres",
    "regimen",
    "aseguradora",
    "municipio",
    "area_residencia",
    "barrio",
    "direccion",
    "eps",
    "telefono",
    "grupo_etnico",
    "c_desplazamiento",
    "c_discapacidad",
    "correo",
    "c_usuaria",
    "fecha_parto",
    "tipo_poblacion",
    "dosis_aplicada",
    "biologico",
    "lote_biologico",
    "jeringa",
    "lote_jeringa",
    "evento_postvacunal",
    "vacunador",
    "municipio_reporta",
    "novedad",
    "desc_novedad",
    "modalidad_vacunacion",
    "nota_enfermeria",
    "jornada",
];

/// Columns the registry wants as numbers.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "documento",
    "telefono",
    "c_desplazamiento",
    "c_discapacidad",
    "c_usuaria",
    "dosis_aplicada",
    "lote_jeringa",
    "evento_postvacunal",
];

const SPANISH_MONTHS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

const ARM_VARIANTS: &[(&str, &str)] = &[
    ("IZQUIERDO", "IZQUIERDO"),
    ("IZQUIERDA", "IZQUIERDO"),
    ("IZQ", "IZQUIERDO"),
    ("IZ", "IZQUIERDO"),
    ("I", "IZQUIERDO"),
    ("IQ", "IZQUIERDO"),
    ("DERECHO", "DERECHO"),
    ("DERECHA", "DERECHO"),
    ("DER", "DERECHO"),
    ("DE", "DERECHO"),
    ("D", "DERECHO"),
    ("DR", "DERECHO"),
];

const COLUMN_WIDTHS: &[(&str, f64)] = &[
    ("fecha_vacunacion", 15.0),
    ("tipo_documento", 12.0),
    ("documento", 15.0),
    ("fecha_nacimiento", 15.0),
    ("sexo", 12.0),
    ("primer_apellido", 18.0),
    ("segundo_apellido", 18.0),
    ("nombres", 25.0),
    ("regimen", 15.0),
    ("aseguradora", 20.0),
    ("municipio", 12.0),
    ("area_residencia", 12.0),
    ("barrio", 20.0),
    ("direccion", 30.0),
    ("eps", 20.0),
    ("telefono", 15.0),
    ("grupo_etnico", 12.0),
    ("c_desplazamiento", 14.0),
    ("c_discapacidad", 14.0),
    ("correo", 35.0),
    ("c_usuaria", 10.0),
    ("fecha_parto", 12.0),
    ("tipo_poblacion", 12.0),
    ("dosis_aplicada", 12.0),
    ("biologico", 20.0),
    ("lote_biologico", 15.0),
    ("jeringa", 20.0),
    ("lote_jeringa", 12.0),
    ("evento_postvacunal", 16.0),
    ("vacunador", 15.0),
    ("municipio_reporta", 15.0),
    ("novedad", 12.0),
    ("desc_novedad", 15.0),
    ("modalidad_vacunacion", 18.0),
    ("nota_enfermeria", 80.0),
    ("jornada", 25.0),
];

/// Operator-supplied data per vaccine.
#[derive(Debug, Clone)]
pub struct VaccineInputs {
    pub lot: String,
    pub expiry: String,
}

#[derive(Debug)]
pub struct CarnetSummary {
    pub patients: usize,
    pub applications: usize,
    /// `(primary keyword, applications)` for each vaccine actually seen.
    pub counts: Vec<(String, usize)>,
    pub output: PathBuf,
}

/// Heuristic mapping from the platform's export headers to canonical
/// fields, plus per-vaccine arm columns.
#[derive(Debug, Default)]
pub struct ColumnMap {
    fields: HashMap<&'static str, usize>,
    arms: HashMap<&'static str, usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Self {
        let mut map = ColumnMap::default();

        for (idx, header) in headers.iter().enumerate() {
            // Accents are stripped so "Atención" still matches.
            let upper = crate::email::normalize_text(header).to_uppercase().trim().to_string();
            let field = if upper.contains("FECHA") && upper.contains("ATENCION") {
                "fecha_atencion"
            } else if upper.contains("TIPO") && upper.contains("DOCUMENTO") {
                "tipo_documento"
            } else if upper.contains("NUMERO") && upper.contains("DOCUMENTO") {
                "numero_documento"
            } else if upper.contains("PRIMER NOMBRE") {
                "primer_nombre"
            } else if upper.contains("SEGUNDO NOMBRE") {
                "segundo_nombre"
            } else if upper.contains("PRIMER APELLIDO") {
                "primer_apellido"
            } else if upper.contains("SEGUNDO APELLIDO") {
                "segundo_apellido"
            } else if upper.contains("FECHA") && upper.contains("NACIMIENTO") {
                "fecha_nacimiento"
            } else if upper.contains("TELEFON") || upper.contains("NUMERO TELEFONICO") {
                "telefono"
            } else if upper.contains("CORREO") {
                "correo"
            } else if upper.contains("DIRECC") {
                "direccion"
            } else if upper.contains("BARRIO") {
                "barrio"
            } else if upper == "EPS" {
                "eps"
            } else if upper.contains("SEXO") {
                "sexo"
            } else if upper.contains("VACUNA") && upper.contains("NOMBRE") {
                "vacuna"
            } else if upper.contains("JORNADA") || upper.contains("LUGAR") {
                "jornada"
            } else {
                continue;
            };
            map.fields.insert(field, idx);
        }

        // Arm columns carry a vaccine keyword but are not the main
        // vaccine-name column.
        for (idx, header) in headers.iter().enumerate() {
            let upper = crate::email::normalize_text(header).to_uppercase().trim().to_string();
            if upper.contains("NOMBRE") || upper.contains("VACUNA") {
                continue;
            }
            for vaccine in crate::catalog::VACCINE_CATALOG {
                if map.arms.contains_key(vaccine.id) {
                    continue;
                }
                if vaccine.keywords.iter().any(|k| upper.contains(k)) {
                    map.arms.insert(vaccine.id, idx);
                    break;
                }
            }
        }

        map
    }

    pub fn has_vaccine_column(&self) -> bool {
        self.fields.contains_key("vacuna")
    }

    fn value(&self, row: &[String], field: &'static str) -> String {
        self.fields
            .get(field)
            .and_then(|&idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    }

    fn arm_value(&self, row: &[String], vaccine_id: &str) -> Option<String> {
        self.arms
            .get(vaccine_id)
            .and_then(|&idx| row.get(idx))
            .cloned()
    }
}

/// Scan the input workbook for the vaccines it mentions.
pub fn detect_vaccines(path: &Path) -> Result<Vec<&'static Vaccine>, RosterError> {
    let (headers, rows) = read_sheet(path)?;
    let map = ColumnMap::from_headers(&headers);
    if !map.has_vaccine_column() {
        return Err(RosterError::MissingVaccineColumn(headers.join(", ")));
    }
    Ok(detect_in_rows(&map, &rows))
}

fn detect_in_rows(map: &ColumnMap, rows: &[Vec<String>]) -> Vec<&'static Vaccine> {
    let mut found: Vec<&'static Vaccine> = Vec::new();
    for row in rows {
        for biological in parse_biologics(&map.value(row, "vacuna")) {
            if let Some(vaccine) = identify(&biological) {
                if !found.iter().any(|v| v.id == vaccine.id) {
                    found.push(vaccine);
                }
            }
        }
    }
    found.sort_by_key(|v| v.id);
    found
}

/// Run the whole transformation and write the registry workbook.
pub fn transform(
    input: &Path,
    output_dir: Option<&Path>,
    inputs: &HashMap<String, VaccineInputs>,
) -> Result<CarnetSummary, RosterError> {
    let (headers, rows) = read_sheet(input)?;
    let map = ColumnMap::from_headers(&headers);
    if !map.has_vaccine_column() {
        return Err(RosterError::MissingVaccineColumn(headers.join(", ")));
    }

    let detected = detect_in_rows(&map, &rows);
    let mut normalized_inputs: HashMap<&'static str, VaccineInputs> = HashMap::new();
    for vaccine in &detected {
        let supplied = inputs
            .get(vaccine.id)
            .filter(|i| !i.lot.trim().is_empty() && !i.expiry.trim().is_empty())
            .ok_or_else(|| RosterError::MissingVaccineInput(vaccine.display_name.to_string()))?;
        let expiry = parse_and_format_date(&supplied.expiry).ok_or_else(|| {
            RosterError::InvalidExpiry {
                vaccine: vaccine.display_name.to_string(),
                value: supplied.expiry.clone(),
            }
        })?;
        normalized_inputs.insert(
            vaccine.id,
            VaccineInputs {
                lot: supplied.lot.trim().to_string(),
                expiry,
            },
        );
    }

    let first_date = rows.first().map(|row| map.value(row, "fecha_atencion"));

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    let mut output_rows: Vec<Vec<String>> = Vec::new();
    for row in &rows {
        output_rows.extend(process_row(row, &map, &normalized_inputs, &mut counts));
    }

    let output = output_path(input, output_dir, first_date.as_deref(), &detected);
    write_styled_sheet(
        &output,
        "Datos Vacunación",
        &OUTPUT_COLUMNS,
        &output_rows,
        NUMERIC_COLUMNS,
        COLUMN_WIDTHS,
    )?;
    info!(output = %output.display(), rows = output_rows.len(), "carnet workbook written");

    let counts = detected
        .iter()
        .filter_map(|v| {
            let n = counts.get(v.id).copied().unwrap_or(0);
            (n > 0).then(|| (v.keywords[0].to_string(), n))
        })
        .collect();

    Ok(CarnetSummary {
        patients: rows.len(),
        applications: output_rows.len(),
        counts,
        output,
    })
}

/// One output row per recognized biological in the row's vaccine cell.
fn process_row(
    row: &[String],
    map: &ColumnMap,
    inputs: &HashMap<&'static str, VaccineInputs>,
    counts: &mut HashMap<&'static str, usize>,
) -> Vec<Vec<String>> {
    let biologics = parse_biologics(&map.value(row, "vacuna"));

    let fecha_vac = format_date(&map.value(row, "fecha_atencion"));
    let tipo_doc = clean_text(&map.value(row, "tipo_documento"));
    let documento = clean_digits(&map.value(row, "numero_documento"));
    let fecha_nac = format_date(&map.value(row, "fecha_nacimiento"));
    let sexo = translate_sex(&map.value(row, "sexo"));
    let primer_apellido = clean_text(&map.value(row, "primer_apellido"));
    let segundo_apellido = clean_text(&map.value(row, "segundo_apellido"));
    let nombres = full_name(
        &map.value(row, "primer_nombre"),
        &map.value(row, "segundo_nombre"),
    );
    let barrio = clean_text(&map.value(row, "barrio"));
    let direccion = clean_text(&map.value(row, "direccion"));
    let eps = clean_text(&map.value(row, "eps"));
    let telefono = clean_digits(&map.value(row, "telefono"));
    let correo = clean_text(&map.value(row, "correo"));
    let jornada = clean_text(&map.value(row, "jornada"));

    let mut out = Vec::new();
    for biological in biologics {
        let Some(vaccine) = identify(&biological) else {
            continue;
        };
        let Some(supplied) = inputs.get(vaccine.id) else {
            continue;
        };

        let arm = match map.arm_value(row, vaccine.id) {
            Some(raw) => normalize_arm(&raw),
            None => vaccine.default_arm.to_string(),
        };
        *counts.entry(vaccine.id).or_insert(0) += 1;
        let note = nursing_note(vaccine, &supplied.lot, &supplied.expiry, &arm);

        out.push(vec![
            fecha_vac.clone(),
            tipo_doc.clone(),
            documento.clone(),
            fecha_nac.clone(),
            sexo.clone(),
            primer_apellido.clone(),
            segundo_apellido.clone(),
            nombres.clone(),
            String::new(),            // regimen
            String::new(),            // aseguradora
            "CALI".into(),            // municipio
            "URBANA".into(),          // area_residencia
            barrio.clone(),
            direccion.clone(),
            eps.clone(),
            telefono.clone(),
            "NINGUNO".into(),         // grupo_etnico
            "0".into(),               // c_desplazamiento
            "0".into(),               // c_discapacidad
            correo.clone(),
            "0".into(),               // c_usuaria
            "NINGUNO".into(),         // fecha_parto
            "ADULTO".into(),          // tipo_poblacion
            "1".into(),               // dosis_aplicada
            vaccine.display_name.to_string(),
            supplied.lot.clone(),
            vaccine.syringe.to_string(),
            "0".into(),               // lote_jeringa
            "0".into(),               // evento_postvacunal
            "* AUXILIAR".into(),      // vacunador
            "CALI".into(),            // municipio_reporta
            "NINGUNO".into(),         // novedad
            "SIN NOVEDAD".into(),     // desc_novedad
            "EXTRAMURAL".into(),      // modalidad_vacunacion
            note,
            jornada.clone(),
        ]);
    }
    out
}

/// Collapse whitespace and upper-case.
pub fn clean_text(text: &str) -> String {
    lazy_static! {
        static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    }
    SPACES
        .replace_all(text.trim(), " ")
        .to_uppercase()
}

/// Keep only digits (documents, phone numbers).
pub fn clean_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize arm text through the variant dictionary. Unknown values pass
/// through cleaned; empty means the default left arm.
pub fn normalize_arm(arm: &str) -> String {
    let cleaned = clean_text(arm);
    if cleaned.is_empty() {
        return "IZQUIERDO".to_string();
    }
    if let Some((_, canonical)) = ARM_VARIANTS.iter().find(|(k, _)| *k == cleaned) {
        return canonical.to_string();
    }
    for (variant, canonical) in ARM_VARIANTS {
        if cleaned.contains(variant) || variant.contains(cleaned.as_str()) {
            return canonical.to_string();
        }
    }
    cleaned
}

/// MASCULINO/FEMENINO → HOMBRE/MUJER; anything else passes through.
pub fn translate_sex(sexo: &str) -> String {
    let upper = clean_text(sexo);
    if upper.contains("MASCULINO") || upper == "M" {
        "HOMBRE".to_string()
    } else if upper.contains("FEMENINO") || upper == "F" {
        "MUJER".to_string()
    } else {
        upper
    }
}

/// Parse a date in the `d/m/Y` family (also `-`, `.`, space separators,
/// two-digit years) and re-render as `DD/MM/YYYY`.
pub fn parse_and_format_date(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    lazy_static! {
        static ref SEPARATORS: Regex = Regex::new(r"[/\-.]").unwrap();
    }
    let normalized = SEPARATORS.replace_all(text, " ").to_string();

    for fmt in ["%d %m %Y", "%d %m %y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, fmt) {
            return Some(date.format("%d/%m/%Y").to_string());
        }
    }
    for fmt in ["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d-%m-%y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.format("%d/%m/%Y").to_string());
        }
    }
    None
}

/// Best-effort date rendering: unparseable values pass through untouched.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    let first = value.split_whitespace().next().unwrap_or(value);
    parse_and_format_date(first).unwrap_or_else(|| value.to_string())
}

pub fn full_name(primer: &str, segundo: &str) -> String {
    let primer = clean_text(primer);
    let segundo = clean_text(segundo);
    if segundo.is_empty() {
        primer
    } else {
        format!("{primer} {segundo}")
    }
}

/// Split a vaccine cell into individual biologicals.
pub fn parse_biologics(text: &str) -> Vec<String> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = if cleaned.contains(" - ") {
        cleaned.split(" - ").collect()
    } else if cleaned.contains('-') && !cleaned.starts_with('-') {
        cleaned.split('-').collect()
    } else if cleaned.contains('/') {
        cleaned.split('/').collect()
    } else if cleaned.contains(',') {
        cleaned.split(',').collect()
    } else {
        vec![cleaned.as_str()]
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// The registry's nursing note, generated from catalog data.
pub fn nursing_note(vaccine: &Vaccine, lot: &str, expiry: &str, arm: &str) -> String {
    let arm = if arm.is_empty() { "IZQUIERDO" } else { arm };
    format!(
        "Asiste usuario para aplicación de vacuna contra {}, \
         jeringa prellenada, lote {lot}, con fecha de vencimiento {expiry}. \
         Se brinda explicación del procedimiento y se informa sobre posibles efectos posvacunales. \
         Se realiza administración del biológico en región deltoides de brazo {} sin incidencias. \
         Se entrega carnet de vacunas debidamente diligenciado. \
         Paciente refiere haber comprendido la información proporcionada.",
        vaccine.description,
        arm.to_lowercase()
    )
}

/// `BASE CARNET VIRTUAL [<keywords>] DIA <d> <MES>.xlsx`, dated from the
/// first record's attention date, falling back to today.
fn output_path(
    input: &Path,
    output_dir: Option<&Path>,
    first_date: Option<&str>,
    detected: &[&'static Vaccine],
) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let date = first_date
        .and_then(|text| {
            parse_and_format_date(text.split_whitespace().next().unwrap_or(text))
                .and_then(|s| NaiveDate::parse_from_str(&s, "%d/%m/%Y").ok())
        })
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let month = SPANISH_MONTHS[date.month0() as usize];
    let names: Vec<&str> = detected.iter().map(|v| v.keywords[0]).collect();
    let tag = if names.is_empty() {
        "VACUNAS".to_string()
    } else {
        names.join(" - ")
    };

    dir.join(format!(
        "BASE CARNET VIRTUAL [{tag}] DIA {} {month}.xlsx",
        date.day()
    ))
}

//! Spreadsheet tool commands: email validation and the carnet
//! transformation.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use roster_core::{
    detect_vaccines, transform, validate_workbook, CachedMx, DnsMx, EmailIssueKind, VaccineInputs,
};

pub fn validate_emails(file: &Path) -> Result<()> {
    let resolver = CachedMx::new(DnsMx::new().context("starting DNS resolver")?);
    let report = validate_workbook(file, &resolver)?;

    println!("File: {}", report.file.display());
    println!("Email column: {}", report.column);
    println!("{}", "-".repeat(60));

    for issue in &report.issues {
        println!("Row {}: '{}' {}", issue.row, issue.email, issue.detail);
    }

    println!("{}", "=".repeat(60));
    if report.issues.is_empty() {
        println!("All {} addresses are valid.", report.total);
    } else {
        println!("Issues: {}", report.issues.len());
        println!("  Format errors:   {}", report.count(EmailIssueKind::Format));
        println!("  Invalid domains: {}", report.count(EmailIssueKind::Domain));
        println!("  Bad characters:  {}", report.count(EmailIssueKind::Characters));
        println!("  Valid addresses: {}/{}", report.valid(), report.total);
    }
    Ok(())
}

pub fn carnet(
    input: &Path,
    output: Option<&Path>,
    lots: &[String],
    expiries: &[String],
    detect_only: bool,
) -> Result<()> {
    if detect_only {
        let detected = detect_vaccines(input)?;
        if detected.is_empty() {
            println!("No known vaccines in the file.");
        } else {
            println!("Detected vaccines:");
            for vaccine in detected {
                println!("  {}  ({})", vaccine.id, vaccine.display_name);
            }
        }
        return Ok(());
    }

    let lots = parse_pairs(lots, "--lot")?;
    let expiries = parse_pairs(expiries, "--expiry")?;

    let mut inputs: HashMap<String, VaccineInputs> = HashMap::new();
    for (vaccine, lot) in &lots {
        let expiry = expiries
            .get(vaccine)
            .with_context(|| format!("missing --expiry for {vaccine}"))?;
        inputs.insert(
            vaccine.clone(),
            VaccineInputs {
                lot: lot.clone(),
                expiry: expiry.clone(),
            },
        );
    }

    let summary = transform(input, output, &inputs)?;

    println!("Patients processed:  {}", summary.patients);
    println!("Applications:        {}", summary.applications);
    for (vaccine, count) in &summary.counts {
        println!("  {vaccine}: {count}");
    }
    println!("Workbook written to: {}", summary.output.display());
    Ok(())
}

/// Parse repeated `KEY=VALUE` arguments, upper-casing the key.
fn parse_pairs(values: &[String], flag: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for value in values {
        let Some((key, val)) = value.split_once('=') else {
            bail!("{flag} takes VACCINE=VALUE, got '{value}'");
        };
        map.insert(key.trim().to_uppercase(), val.trim().to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs(&["influvac=K17".to_string()], "--lot").unwrap();
        assert_eq!(pairs.get("INFLUVAC").unwrap(), "K17");

        assert!(parse_pairs(&["no-equals".to_string()], "--lot").is_err());
    }
}

//! Email list validation.
//!
//! Three checks, in order: structural (`@` present, ASCII local part),
//! format (anchored pattern over the accent-stripped value), and domain
//! (MX lookup through [`MxLookup`]). The first failing check wins, so a
//! value never reports more than one issue.

use std::path::{Path, PathBuf};

use email_address::EmailAddress;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use tracing::info;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::RosterError;
use crate::mx::MxLookup;
use crate::xlsx::read_sheet;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Header names recognized as the email column.
pub const EMAIL_COLUMN_NAMES: &[&str] = &[
    "correo",
    "email",
    "e-mail",
    "mail",
    "correo electrónico",
    "correo electronico",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailIssueKind {
    /// Malformed address.
    Format,
    /// Accented or otherwise non-ASCII local part.
    Characters,
    /// Domain without MX records.
    Domain,
}

#[derive(Debug, Clone)]
pub struct EmailIssue {
    /// 1-based spreadsheet row (data starts at row 2).
    pub row: usize,
    pub email: String,
    pub kind: EmailIssueKind,
    pub detail: String,
}

/// Strip combining marks after NFKD decomposition: `pérez` → `perez`.
pub fn normalize_text(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Format check over an already-normalized value.
pub fn is_valid_email_format(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || !email.is_ascii() {
        return false;
    }
    EMAIL_PATTERN.is_match(email) && EmailAddress::is_valid(email)
}

/// Index of the email column among `headers`, matched case-insensitively.
pub fn find_email_column(headers: &[String]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    EMAIL_COLUMN_NAMES
        .iter()
        .find_map(|name| lowered.iter().position(|h| h == name))
}

/// Validate one cell. Empty cells are fine (blank rows are common in
/// exported sheets).
pub fn validate_value(row: usize, raw: &str, mx: &dyn MxLookup) -> Option<EmailIssue> {
    let email = raw.trim();
    if email.is_empty() {
        return None;
    }

    if !email.contains('@') {
        return Some(EmailIssue {
            row,
            email: email.to_string(),
            kind: EmailIssueKind::Format,
            detail: "Missing the '@' character".into(),
        });
    }

    let (user, _) = email.split_once('@').unwrap();
    if !user.is_ascii() {
        return Some(EmailIssue {
            row,
            email: email.to_string(),
            kind: EmailIssueKind::Characters,
            detail: "Local part contains accents or unsupported characters".into(),
        });
    }

    let clean = normalize_text(email);
    if !is_valid_email_format(&clean) {
        return Some(EmailIssue {
            row,
            email: email.to_string(),
            kind: EmailIssueKind::Format,
            detail: "Invalid email format".into(),
        });
    }

    let domain = clean.trim().split('@').nth(1).unwrap_or_default().to_string();
    if !mx.has_mx(&domain) {
        return Some(EmailIssue {
            row,
            email: email.to_string(),
            kind: EmailIssueKind::Domain,
            detail: format!("Invalid domain ({domain})"),
        });
    }

    None
}

/// Outcome of validating one workbook.
#[derive(Debug)]
pub struct ValidationReport {
    pub file: PathBuf,
    pub column: String,
    pub total: usize,
    pub issues: Vec<EmailIssue>,
}

impl ValidationReport {
    pub fn count(&self, kind: EmailIssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn valid(&self) -> usize {
        self.total - self.issues.len()
    }
}

/// Validate every address in the workbook's email column, fanning the
/// rows out over the thread pool. Issues come back ordered by row.
pub fn validate_workbook(
    path: &Path,
    mx: &dyn MxLookup,
) -> Result<ValidationReport, RosterError> {
    let (headers, rows) = read_sheet(path)?;
    let column = find_email_column(&headers)
        .ok_or_else(|| RosterError::MissingEmailColumn(headers.join(", ")))?;

    let values: Vec<(usize, String)> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx + 2, row.get(column).cloned().unwrap_or_default()))
        .collect();
    let total = values.len();

    let mut issues: Vec<EmailIssue> = values
        .par_iter()
        .filter_map(|(row, value)| validate_value(*row, value, mx))
        .collect();
    issues.sort_by_key(|issue| issue.row);

    info!(file = %path.display(), total, issues = issues.len(), "email validation finished");

    Ok(ValidationReport {
        file: path.to_path_buf(),
        column: headers[column].clone(),
        total,
        issues,
    })
}

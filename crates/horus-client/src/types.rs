//! Wire types and lookup outcomes for the Horus Health affiliate API.
//!
//! The JSON field names are the registry's own (Spanish); the report
//! markers (`REVISAR`, `TOKEN INVÁLIDO`, …) are the strings the billing
//! staff expect to see in exported sheets.

use serde::{Deserialize, Serialize};

/// Identity document classes the registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// Cédula de ciudadanía.
    Cc,
    /// Tarjeta de identidad.
    Ti,
    /// Registro civil.
    Rc,
}

impl DocumentType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "CC" => Some(Self::Cc),
            "TI" => Some(Self::Ti),
            "RC" => Some(Self::Rc),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Cc => "CC",
            Self::Ti => "TI",
            Self::Rc => "RC",
        }
    }

    /// Numeric id used in the lookup URL.
    pub fn type_id(self) -> u8 {
        match self {
            Self::Cc => 1,
            Self::Ti => 2,
            Self::Rc => 3,
        }
    }
}

/// A parsed `TYPE+NUMBER` identifier like `CC123456789`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId {
    pub doc_type: DocumentType,
    pub number: String,
}

/// Split a raw identifier into letters (type) and digits (number).
pub fn parse_document(raw: &str) -> Option<DocumentId> {
    let letters: String = raw.chars().filter(|c| c.is_alphabetic()).collect();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(DocumentId {
        doc_type: DocumentType::from_code(&letters)?,
        number: digits,
    })
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

/// Affiliate record as returned by the lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliateRecord {
    pub primer_nombre: Option<String>,
    pub segundo_nombre: Option<String>,
    pub primer_apellido: Option<String>,
    pub segundo_apellido: Option<String>,
    pub estado_afiliado: Option<NamedField>,
    pub ips: Option<NamedField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedField {
    pub nombre: Option<String>,
}

impl AffiliateRecord {
    pub fn full_name(&self) -> String {
        [
            &self.primer_nombre,
            &self.segundo_nombre,
            &self.primer_apellido,
            &self.segundo_apellido,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Outcome of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Found {
        name: String,
        status: String,
        ips: String,
    },
    /// Not a `TYPE+NUMBER` identifier the registry knows.
    InvalidFormat,
    /// The API rejected the bearer token.
    Unauthorized,
    /// Non-success HTTP status.
    Rejected(u16),
    /// Transport-level failure.
    Failed(String),
    /// No login before querying.
    NotLoggedIn,
}

/// One result row: the raw document plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow {
    pub document: String,
    pub status: LookupStatus,
}

impl LookupRow {
    /// Render as the four report columns: document, name, status, IPS.
    pub fn columns(&self) -> [String; 4] {
        let doc = self.document.clone();
        match &self.status {
            LookupStatus::Found { name, status, ips } => {
                [doc, name.clone(), status.clone(), ips.clone()]
            }
            LookupStatus::InvalidFormat => {
                [doc, "REVISAR (formato inválido)".into(), String::new(), String::new()]
            }
            LookupStatus::Unauthorized => {
                [doc, "TOKEN INVÁLIDO".into(), String::new(), String::new()]
            }
            LookupStatus::Rejected(code) => {
                [doc, format!("REVISAR ({code})"), String::new(), String::new()]
            }
            LookupStatus::Failed(message) => {
                [doc, format!("ERROR ({message})"), String::new(), String::new()]
            }
            LookupStatus::NotLoggedIn => {
                [doc, "DESCONECTADO".into(), String::new(), String::new()]
            }
        }
    }
}

//! Spreadsheet tooling for the back-office suite: email list validation
//! and the vaccination record ("carnet virtual") transformation.

pub mod carnet;
pub mod catalog;
pub mod email;
pub mod error;
pub mod mx;
pub mod xlsx;

pub use carnet::{detect_vaccines, transform, CarnetSummary, VaccineInputs};
pub use catalog::{identify, Vaccine, VACCINE_CATALOG};
pub use email::{
    find_email_column, validate_value, validate_workbook, EmailIssue, EmailIssueKind,
    ValidationReport,
};
pub use error::RosterError;
pub use mx::{CachedMx, DnsMx, MxLookup};

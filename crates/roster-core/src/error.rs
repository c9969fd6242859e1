use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Could not read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Could not write workbook: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook has no data sheet")]
    NoSheet,

    #[error("No email column found. Available columns: {0}")]
    MissingEmailColumn(String),

    #[error("No vaccine column found. Available columns: {0}")]
    MissingVaccineColumn(String),

    #[error("Missing lot or expiry date for vaccine {0}")]
    MissingVaccineInput(String),

    #[error("Invalid expiry date for vaccine {vaccine}: {value}")]
    InvalidExpiry { vaccine: String, value: String },

    #[error("DNS resolver unavailable: {0}")]
    Resolver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

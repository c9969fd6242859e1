use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorusError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Workbook(#[from] roster_core::RosterError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

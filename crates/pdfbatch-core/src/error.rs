use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfBatchError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("PDF operation failed: {0}")]
    Operation(String),

    #[error("Got {got} names for {expected} pages")]
    NameCount { expected: usize, got: usize },

    #[error("Invalid rename pattern: {0}")]
    Pattern(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

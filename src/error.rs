use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading records or reading request inputs
#[derive(Debug)]
pub enum A2lError {
    /// I/O errors
    Io(std::io::Error),
    /// Database file could not be read or written as JSON
    Json(serde_json::Error),
    /// CSV reading or writing failed
    Csv(csv::Error),
    /// Neither `<stem>.a2ldb` nor `<stem>.a2l` exists
    NotFound(PathBuf),
    /// Address token is neither `0x`-prefixed hex nor decimal
    InvalidAddress(String),
    /// Request CSV lacks a required column
    MissingColumn(String),
    /// Malformed block in an A2L description file
    Import(String),
    /// Coefficient set present but not usable
    Coefficients(String),
}

impl fmt::Display for A2lError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2lError::Io(err) => write!(f, "I/O error: {}", err),
            A2lError::Json(err) => write!(f, "Database format error: {}", err),
            A2lError::Csv(err) => write!(f, "CSV error: {}", err),
            A2lError::NotFound(stem) => write!(
                f,
                "Neither {0}.a2ldb nor {0}.a2l found",
                stem.display()
            ),
            A2lError::InvalidAddress(token) => write!(f, "Invalid address format: {}", token),
            A2lError::MissingColumn(column) => write!(f, "CSV input is missing column '{}'", column),
            A2lError::Import(msg) => write!(f, "A2L import error: {}", msg),
            A2lError::Coefficients(msg) => write!(f, "Invalid coefficients: {}", msg),
        }
    }
}

impl std::error::Error for A2lError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            A2lError::Io(err) => Some(err),
            A2lError::Json(err) => Some(err),
            A2lError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for A2lError {
    fn from(err: std::io::Error) -> Self {
        A2lError::Io(err)
    }
}

impl From<serde_json::Error> for A2lError {
    fn from(err: serde_json::Error) -> Self {
        A2lError::Json(err)
    }
}

impl From<csv::Error> for A2lError {
    fn from(err: csv::Error) -> Self {
        A2lError::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, A2lError>;

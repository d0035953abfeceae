use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors surfaced while translating a document
#[derive(Debug)]
pub enum TranslateError {
    /// A markdown construct the translator does not handle
    UnsupportedConstruct(String),
    /// Missing or invalid translator settings
    Configuration(String),
    /// The translation request itself failed
    Http(reqwest::Error),
    /// The translation service answered with a non-success status
    Api { status: u16, message: String },
    /// The translation service answered with a body we cannot use
    MalformedResponse(String),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnsupportedConstruct(what) => {
                write!(f, "unsupported markdown construct: {}", what)
            }
            TranslateError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            TranslateError::Http(e) => write!(f, "translation request failed: {}", e),
            TranslateError::Api { status, message } => {
                write!(f, "translation service returned HTTP {}: {}", status, message)
            }
            TranslateError::MalformedResponse(msg) => {
                write!(f, "malformed translation response: {}", msg)
            }
        }
    }
}

impl Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(error: reqwest::Error) -> Self {
        TranslateError::Http(error)
    }
}

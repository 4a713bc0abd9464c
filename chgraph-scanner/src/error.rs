use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unrecognized URL: {0}")]
    UnrecognizedUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ScanError {
    pub(crate) fn missing(selector: &str, url: &str) -> Self {
        ScanError::ParseError(format!("element `{}` not found on {}", selector, url))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

//! Error type shared by the wallet crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing credentials, invalid options, empty report windows.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external source (web page, PDF) did not have the expected shape.
    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot parse {kind} from '{value}'")]
    Parse { kind: &'static str, value: String },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    pub fn parse(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            value: value.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("BUDGETBACKERS_EMAIL is not set");
        assert_eq!(
            err.to_string(),
            "configuration error: BUDGETBACKERS_EMAIL is not set"
        );
        assert!(err.is_config());
    }

    #[test]
    fn test_parse_error_counts_as_extraction() {
        let err = Error::parse("money", "12 apples");
        assert_eq!(err.to_string(), "cannot parse money from '12 apples'");
        assert!(err.is_extraction());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

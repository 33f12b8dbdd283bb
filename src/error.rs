use thiserror::Error;

/// Failures surfaced by the node.
///
/// `Parameter` and `Request` are per-item failures: their `Display` text is the
/// message that ends up in an `{"error": ...}` output item when the run
/// continues on failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Parameter(String),

    #[error("{0}")]
    Request(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

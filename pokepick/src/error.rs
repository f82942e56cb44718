#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    RemoteConflict(String),
    #[error("request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Error::MalformedRecord(error.to_string())
        } else {
            Error::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::MalformedRecord(error.to_string())
    }
}

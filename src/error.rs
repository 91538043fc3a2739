use std::fmt;

use hmac::crypto_mac::InvalidKeyLength;

#[derive(Debug)]
pub enum Error {
    /// The object does not exist at the resolved path. Recoverable; expected
    /// during existence checks and `get_first` fallback.
    NotFound(String),
    /// Any response the store returned that is neither 200 nor 404. Carries
    /// the status code and response body verbatim for diagnostics.
    Store { status: u16, body: String },
    /// Signing primitive rejected the key. A deployment defect, not a
    /// per-request condition.
    Sign(String),
    /// Empty path or malformed endpoint, rejected before any network call.
    InvalidArgument(String),
    /// Transport-level failure from the HTTP collaborator.
    Request(reqwest::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotFound(path) => format!("Not Found: {}", path),
            Self::Store { status, body } => format!("Store Error: {} - {}", status, body),
            Self::Sign(msg) => format!("Sign Error: {}", msg),
            Self::InvalidArgument(msg) => format!("Invalid Argument: {}", msg),
            Self::Request(e) => format!("Execute Request Error: {}", e),
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidKeyLength> for Error {
    fn from(e: InvalidKeyLength) -> Self {
        Self::Sign(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

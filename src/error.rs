use crate::data::{RequestFailure, ResponseData};
use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    /// An actual request matched none of the pending expected exchanges.
    NoMatchingExchange,
    /// The matched exchange carries an error-status response; mirrors an
    /// HTTP client rejecting on 4xx/5xx.
    ErrorResponse(ResponseData),
    /// The matched exchange was registered as a failed request.
    RequestFailure(RequestFailure),
    /// Expected exchanges were still pending after the test body completed.
    UnmetExpectations(usize),
    JsonEncode(serde_json::Error),
    FileRead { path: String, source: io::Error },
    InvalidJsonFile { path: String, source: serde_json::Error },
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoMatchingExchange => {
                write!(f, "The request doesn't match any expected exchange")
            }
            Error::ErrorResponse(response) => write!(
                f,
                "The request was resolved with an error status code {}",
                response.status_code
            ),
            Error::RequestFailure(failure) => write!(f, "Request failure: {}", failure.message),
            Error::UnmetExpectations(count) => {
                write!(f, "{} expected exchange(s) were never matched", count)
            }
            Error::JsonEncode(e) => write!(f, "JSON encoding error: {}", e),
            Error::FileRead { path, source } => {
                write!(f, "Cannot load file {}: {}", path, source)
            }
            Error::InvalidJsonFile { path, source } => {
                write!(f, "File {} is not JSON: {}", path, source)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonEncode(e)
    }
}

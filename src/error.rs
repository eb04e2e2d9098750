//! Unified error type.

use std::fmt;

/// The error type returned by tsu-chain's fallible operations.
///
/// Composing middleware never fails. This type only surfaces when a header
/// is set from a runtime string that is not a valid HTTP header name or
/// value, see [`Request::set_header`](crate::Request::set_header) and
/// [`Response::set_header`](crate::Response::set_header).
#[derive(Debug)]
pub struct Error(http::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Self(e)
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(e: http::header::InvalidHeaderName) -> Self {
        Self(e.into())
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Self(e.into())
    }
}

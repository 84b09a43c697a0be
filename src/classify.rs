//! Response classification.
//!
//! Decides from the status code and content type alone whether a search
//! response is worth reading as JSON. Runs before any body bytes are read.

use std::fmt;

/// Status code the endpoint must answer with.
pub const EXPECTED_STATUS: u16 = 200;

/// Media type prefix the endpoint must answer with.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json";

/// Why a response failed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Status code other than 200.
    UnexpectedStatus(u16),
    /// Content type that does not start with `application/json`.
    /// `None` when the header was absent.
    UnexpectedContentType(Option<String>),
}

impl Rejection {
    /// Short reason without the observed value.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnexpectedStatus(_) => "unexpected status code",
            Self::UnexpectedContentType(_) => "unexpected content type",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedStatus(code) => write!(f, "{}: {}", self.reason(), code),
            Self::UnexpectedContentType(Some(observed)) => write!(
                f,
                "{}: expected {} but received {}",
                self.reason(),
                EXPECTED_CONTENT_TYPE,
                observed
            ),
            Self::UnexpectedContentType(None) => write!(
                f,
                "{}: expected {} but no content type was sent",
                self.reason(),
                EXPECTED_CONTENT_TYPE
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Classifies a response head.
///
/// A status mismatch is reported even when the content type is also wrong.
pub fn classify(status: u16, content_type: Option<&str>) -> Result<(), Rejection> {
    if status != EXPECTED_STATUS {
        return Err(Rejection::UnexpectedStatus(status));
    }

    match content_type {
        Some(ct) if ct.starts_with(EXPECTED_CONTENT_TYPE) => Ok(()),
        other => Err(Rejection::UnexpectedContentType(other.map(String::from))),
    }
}

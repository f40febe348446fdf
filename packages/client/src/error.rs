use std::fmt;

use crate::archive::ArchiveError;
use crate::models::ServerError;

/// A protocol-level status failure that carries the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub code: u16,
    pub message: String,
    pub url: String,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.code, self.message, self.url)
    }
}

impl std::error::Error for StatusError {}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("not found: {0}")]
    NotFound(StatusError),

    #[error("server error (HTTP {status}): {error}")]
    Server {
        status: u16,
        error: ServerError,
        body: Vec<u8>,
    },

    #[error("HTTP {status} with unreadable error body: {source}")]
    MalformedErrorBody {
        status: u16,
        body: Vec<u8>,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("could not decode response: {source}")]
    Decode {
        body: Vec<u8>,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("could not encode request: {0}")]
    Encode(#[from] quick_xml::SeError),

    #[error("Project {key} Not Found")]
    ProjectNotFound { key: String },

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl Error {
    /// True for the protocol-level 404 only.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Transport { .. })
    }

    /// HTTP status behind this error, if the exchange got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound(e) => Some(e.code),
            Error::Server { status, .. } | Error::MalformedErrorBody { status, .. } => {
                Some(*status)
            }
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body kept by the error, when one was received.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Error::Server { body, .. }
            | Error::MalformedErrorBody { body, .. }
            | Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            Error::Server { error, .. } => Some(error),
            _ => None,
        }
    }
}

//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = ConverterError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum ConverterError {
    InvalidArgument(InvalidArgumentError),
    InvalidDocument(InvalidDocumentError),
    JsonError(serde_json::Error),
    IOError(std::io::Error),
}

impl ConverterError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_document<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidDocument(InvalidDocumentError { msg: msg.into() })
    }
}

impl fmt::Display for ConverterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidDocument(e) => e.fmt(f),
            Self::JsonError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for ConverterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::JsonError(e) => Some(e),
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a dictionary or auto-tag document is well-formed JSON but
/// has an unexpected shape.
#[derive(Debug)]
pub struct InvalidDocumentError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidDocumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidDocumentError: {}", self.msg)
    }
}

impl Error for InvalidDocumentError {}

impl From<serde_json::Error> for ConverterError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonError(error)
    }
}

impl From<std::io::Error> for ConverterError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}

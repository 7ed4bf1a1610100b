// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors that abort a conversion.
///
/// Anomalies inside a header (unattributable registers, incomplete fields)
/// are not errors; they are logged and the conversion continues.
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The SVD input is not well-formed XML
    #[error("malformed SVD document: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    /// The SVD output could not be written
    #[error("failed to write SVD document: {0}")]
    XmlWrite(#[from] xmltree::Error),

    #[error("SVD output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A required SVD element is absent
    #[error("{parent} is missing <{element}>")]
    MissingElement {
        parent: String,
        element: &'static str,
    },

    /// An SVD element holds text that is not an integer
    #[error("{parent}: invalid integer {value:?} in <{element}>")]
    InvalidInteger {
        parent: String,
        element: &'static str,
        value: String,
    },

    /// A field `<bitRange>` is not of the form `[msb:lsb]` with `msb >= lsb`
    #[error("{parent}: invalid bit range {value:?}")]
    InvalidBitRange { parent: String, value: String },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for xsdoc operations.

use thiserror::Error;

/// Errors that can occur while loading or resolving a documentation tree.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Cyclic reference to '{id}' (resolution chain: {})", chain.join(" -> "))]
    CyclicReference { id: String, chain: Vec<String> },

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

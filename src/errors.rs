/*!
 * Error types for the wikiscript application.
 *
 * This module contains custom error types for the different stages of a run
 * (fetching, link discovery, transcript parsing), using the thiserror crate
 * for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while retrieving a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("Request failed for {url}: {message}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying client error
        message: String,
    },

    /// The server answered with a non-success status
    #[error("Server responded with {status_code} for {url}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Requested URL
        url: String,
    },

    /// The response body could not be decoded as text
    #[error("Failed to decode response body from {url}: {message}")]
    Decode {
        /// Requested URL
        url: String,
        /// Decoder error
        message: String,
    },

    /// A local page could not be read
    #[error("Failed to read page file {path}: {message}")]
    File {
        /// File path
        path: String,
        /// IO error
        message: String,
    },
}

/// Errors raised while listing episode links from an index page
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// A listed anchor lacks an attribute the index layout guarantees
    #[error("Anchor #{position} in the episode list has no '{attribute}' attribute")]
    MissingAttribute {
        /// Name of the missing attribute (`title` or `href`)
        attribute: &'static str,
        /// 1-based position of the anchor among listed anchors
        position: usize,
    },
}

/// Errors raised while building an episode from transcript markup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A dialogue line already carries speech and a second one was attributed to it
    #[error("Speech for '{speaker}' was already set; refusing to overwrite it")]
    SpeechAlreadySet {
        /// Speaker of the affected line
        speaker: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from page retrieval
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from link discovery
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Error from transcript parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A URL could not be parsed or joined
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// Offending URL text
        url: String,
        /// Parser message
        message: String,
    },

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

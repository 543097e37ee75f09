//! Error types for the tune finder
//!
//! Every variant ends the invocation. Nothing is retried.

use thiserror::Error;

/// Main error type for the `tunes` crate
#[derive(Error, Debug)]
pub enum TunesError {
    /// Catalog answered with a non-success HTTP status
    #[error("Remote fetch failed: {url} returned HTTP {status}")]
    RemoteFetch { url: String, status: u16 },

    /// Request never produced a response (DNS, connect, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint URL could not be built from the configured base
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Free text was typed at the setting prompt
    #[error("No setting selected: pick one of the listed settings")]
    NoSettingSelected,

    /// Picker and candidate list disagree (index out of range)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Picker output does not follow the `<index>:<text>` format
    #[error("Picker protocol error: {0}")]
    PickerProtocol(String),

    /// A rendering stage exited unsuccessfully
    #[error("Conversion stage '{stage}' failed: {status}")]
    ConversionFailed { stage: String, status: String },

    /// Process spawn or pipe I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// tunes-common error
    #[error("Common error: {0}")]
    Common(#[from] tunes_common::Error),
}

/// Convenience Result type using [`TunesError`]
pub type Result<T> = std::result::Result<T, TunesError>;

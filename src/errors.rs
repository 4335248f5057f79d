/*!
 * Error types for the linguaflow application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when building or sending the API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP (or provider-reported) status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur during a translation attempt
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Nothing to translate after trimming the input
    #[error("No text submitted for translation")]
    EmptyInput,

    /// Transport, timeout or parse failure
    #[error("Network error: {0}")]
    Network(#[from] ProviderError),

    /// The provider answered but no usable translation was found
    #[error("Provider returned no usable translation")]
    EmptyResponse,
}

/// Errors raised by the key-value storage layer.
///
/// These never reach callers of the history store; they are logged and absorbed there.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing the value would exceed the backend's capacity
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes available")]
    QuotaExceeded {
        /// Bytes the store would hold after the write
        needed: usize,
        /// Configured capacity in bytes
        quota: usize,
    },

    /// Backend failure (SQLite, I/O)
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A list could not be serialized before writing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Swapping languages is not possible in the current state
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SwapError {
    /// The source language is the auto-detect sentinel
    #[error("Cannot swap languages while auto-detect is selected")]
    AutoDetect,
}

/// Speak/copy refused because no real translation is displayed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// Output area is empty or shows a status message
    #[error("No translation is currently displayed")]
    NoTranslation,
}

//! Error types for the Exit Runway Engine.
//!
//! The calculation path itself never fails: degenerate input resolves to a
//! defined fallback value. Errors only arise while loading configuration or
//! when a caller explicitly asks for strict input validation.

use thiserror::Error;

/// The main error type for the Exit Runway Engine.
///
/// # Example
///
/// ```
/// use exit_runway_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A region rule in the postal-code table is malformed.
    #[error("Invalid region rule '{region}': {message}")]
    InvalidRegionTable {
        /// The name of the offending region rule.
        region: String,
        /// A description of what is wrong with the rule.
        message: String,
    },

    /// A scenario input field is outside its documented domain.
    #[error("Invalid scenario field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/*!
 * Error types for the lyricsync library.
 *
 * The timing pipeline itself never fails on bad lyric data: malformed words
 * and lines are dropped and an empty timeline is a valid result. The errors
 * here cover the edges around it, i.e. reading raw payloads and loading
 * configuration, using the thiserror crate for ergonomic definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading raw lyric payloads
#[derive(Error, Debug)]
pub enum LyricError {
    /// The payload could not be read from disk
    #[error("Failed to read lyric data: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not JSON at all
    #[error("Lyric data is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Delay written in the config file is outside the accepted range
    #[error("Delay {delay_ms}ms is outside the accepted range [{min_ms}, {max_ms}]")]
    DelayOutOfRange {
        /// Configured delay
        delay_ms: i64,
        /// Lower bound
        min_ms: i64,
        /// Upper bound
        max_ms: i64,
    },

    /// Tick interval of zero or an absurd value
    #[error("Invalid tick interval: {0}ms")]
    InvalidTickInterval(u64),

    /// Synthesized word duration for lenient parsing must be positive
    #[error("Invalid lenient word duration: {0}ms")]
    InvalidLenientDuration(i64),

    /// Config file could not be read or written
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents could not be parsed or serialized
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error reading lyric data
    #[error("Lyric error: {0}")]
    Lyric(#[from] LyricError),

    /// Error in configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

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

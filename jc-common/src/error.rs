//! Common error types for the journal checker

use thiserror::Error;

/// Common result type for journal checker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the journal checker crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or command-line argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

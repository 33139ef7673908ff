#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use crud_swagger_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Generation, loading or validation failure.
    #[display("{}", _0)]
    App(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_is_transparent() {
        let err: CliError = AppError::UnknownRelease("9.9.9".into()).into();
        assert_eq!(err.to_string(), "Unknown release: 9.9.9");
    }
}

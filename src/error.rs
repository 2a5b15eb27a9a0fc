use crate::writer::Cancelled;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for decompiler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error types for the AVM2 decompiler
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(avm2_dec::io_error))]
    Io(String),

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(avm2_dec::config_error))]
    Config { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(avm2_dec::json_error))]
    Json { message: String },

    #[error("Unsupported image format in {name}")]
    #[diagnostic(
        code(avm2_dec::unsupported_image_format),
        help("only BMP, JPEG, PNG and GIF images can be imported as bitmaps")
    )]
    UnsupportedImageFormat { name: String },

    #[error("No character with id {id}")]
    #[diagnostic(code(avm2_dec::unknown_character))]
    UnknownCharacter { id: u16 },

    #[error("Character {id} is not a shape")]
    #[diagnostic(code(avm2_dec::not_a_shape))]
    NotAShape { id: u16 },

    #[error("Operation was cancelled")]
    #[diagnostic(code(avm2_dec::cancelled))]
    Cancelled,

    #[error("Internal error: {message}")]
    #[diagnostic(code(avm2_dec::internal_error))]
    Internal { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Cancellation is an outcome, not a failure; callers branch on it
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
        }
    }
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Error::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_converts_and_is_recognized() {
        let err: Error = Cancelled.into();
        assert!(err.is_cancelled());
        assert!(!Error::internal("boom").is_cancelled());
    }

    #[test]
    fn test_messages() {
        assert_eq!(Error::NotAShape { id: 4 }.to_string(), "Character 4 is not a shape");
        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.to_string(), "I/O error: gone");
    }
}

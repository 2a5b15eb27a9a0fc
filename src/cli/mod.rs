//! Command-line interface module
//!
//! This module contains the implementations for the CLI subcommands.

pub mod fold;
pub mod import_shapes;
pub mod render;

/// Common CLI utilities
pub mod utils {
    use crate::error::{Error as DecompilerError, Result as DecompilerResult};
    use crate::writer::CancellationToken;
    use std::path::Path;
    use std::time::Duration;

    /// Read a file into a string
    pub fn read_text(path: &Path) -> DecompilerResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| DecompilerError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Write output to file or stdout
    pub fn write_output(content: &str, output_path: Option<&Path>) -> DecompilerResult<()> {
        match output_path {
            Some(path) => std::fs::write(path, content).map_err(DecompilerError::from),
            None => {
                print!("{}", content);
                Ok(())
            }
        }
    }

    /// A token that cancels itself after `timeout_ms`, if given
    pub fn token_with_timeout(timeout_ms: Option<u64>) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(timeout_ms) = timeout_ms {
            let watchdog = token.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(timeout_ms));
                log::warn!("Timeout of {} ms reached, cancelling", timeout_ms);
                watchdog.cancel();
            });
        }
        token
    }
}

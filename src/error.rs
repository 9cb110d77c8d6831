//! Game error types.
//!
//! Fallible helpers (file I/O, script parsing, checkpoint lookup) return
//! [`GameResult`]. Systems absorb these errors at the boundary: they log and
//! fall back to a safe default instead of stopping the game loop.
//!
//! ## Usage
//!
//! ```rust
//! use typing_shooter::error::{GameError, GameResult};
//!
//! fn position_of(id: u32, known: &[u32]) -> GameResult<usize> {
//!     known
//!         .iter()
//!         .position(|&k| k == id)
//!         .ok_or(GameError::CheckpointNotFound { id })
//! }
//! # assert!(position_of(2, &[1, 2]).is_ok());
//! ```

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for the typing shooter core.
#[derive(Debug)]
pub enum GameError {
    /// A file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The campaign script is not valid JSON or its root has the wrong shape.
    ScriptFormat {
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// The checkpoint store could not be decoded or encoded.
    StoreFormat { reason: String },

    /// A checkpoint id was requested that the campaign or the store does not know.
    CheckpointNotFound { id: u32 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "i/o error on {}: {}", path.display(), source)
            }
            GameError::ScriptFormat { reason } => {
                write!(f, "malformed campaign script: {}", reason)
            }
            GameError::StoreFormat { reason } => {
                write!(f, "malformed checkpoint store: {}", reason)
            }
            GameError::CheckpointNotFound { id } => write!(f, "checkpoint {} not found", id),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = GameError::CheckpointNotFound { id: 7 };
        assert_eq!(err.to_string(), "checkpoint 7 not found");
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error;
        let err = GameError::Io {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.toml"));
    }
}

//! Error type shared by restore, storage and codec paths.
//!
//! Ordinary gameplay never fails: out-of-bounds queries return "no tile",
//! moves on a terminated session are no-ops. Errors only arise at the
//! edges, when state crosses into or out of the process.

use derive_more::{Display, Error, From};

/// Errors raised while restoring or persisting a session.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// A restored snapshot is internally inconsistent.
    #[display("corrupt session state: {reason}")]
    #[from(ignore)]
    StateCorrupt {
        #[error(not(source))]
        reason: String,
    },

    /// A session configuration breaks a rule the grid depends on.
    #[display("invalid config: {reason}")]
    #[from(ignore)]
    InvalidConfig {
        #[error(not(source))]
        reason: String,
    },

    /// The backing store could not be read or written.
    #[display("storage error: {_0}")]
    Storage(std::io::Error),

    /// A JSON payload could not be encoded or decoded.
    #[display("codec error: {_0}")]
    Codec(serde_json::Error),

    /// A binary checkpoint could not be encoded or decoded.
    #[display("binary codec error: {_0}")]
    Binary(bincode::Error),
}

impl SessionError {
    /// Build a `StateCorrupt` error.
    #[must_use]
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::StateCorrupt { reason: reason.into() }
    }

    /// Build an `InvalidConfig` error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }

    /// Whether this error means a snapshot should be discarded.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::StateCorrupt { .. } | Self::Codec(_) | Self::Binary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SessionError::corrupt("row 2 has 3 cells, expected 4");
        assert_eq!(err.to_string(), "corrupt session state: row 2 has 3 cells, expected 4");
    }

    #[test]
    fn test_invalid_config_is_not_corrupt() {
        let err = SessionError::invalid_config("grid size must be at least 1");
        assert_eq!(err.to_string(), "invalid config: grid size must be at least 1");
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SessionError = io.into();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_codec_is_corrupt() {
        let err: SessionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_corrupt());
    }
}

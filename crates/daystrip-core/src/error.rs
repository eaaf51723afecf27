//! Error types for configuration loading.
//!
//! Computation modules never fail; only the config layer returns these.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Every validation problem found, one entry each.
    #[error("Invalid configuration:\n  {}", .0.join("\n  "))]
    ConfigValidation(Vec<String>),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = Error::ConfigValidation(vec![
            "phases.day: bad".to_string(),
            "sun.overflow: bad".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("phases.day: bad"));
        assert!(message.contains("\n  sun.overflow: bad"));
    }

    #[test]
    fn test_not_found_shows_path() {
        let err = Error::ConfigNotFound(PathBuf::from("/tmp/nope.toml"));
        assert_eq!(err.to_string(), "Config file not found: /tmp/nope.toml");
    }
}

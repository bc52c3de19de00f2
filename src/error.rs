use thiserror::Error;

/// Unified error type for sembump operations
#[derive(Error, Debug)]
pub enum SembumpError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("File update error: {0}")]
    Update(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in sembump
pub type Result<T> = std::result::Result<T, SembumpError>;

impl SembumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SembumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SembumpError::Version(msg.into())
    }

    /// Create a file update error with context
    pub fn update(msg: impl Into<String>) -> Self {
        SembumpError::Update(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        SembumpError::Changelog(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SembumpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SembumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(SembumpError::version("test").to_string().contains("Version"));
        assert!(SembumpError::update("test").to_string().contains("update"));
        assert!(SembumpError::changelog("test")
            .to_string()
            .contains("Changelog"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (SembumpError::config("x"), "Configuration error"),
            (SembumpError::version("x"), "Version parsing error"),
            (SembumpError::update("x"), "File update error"),
            (SembumpError::changelog("x"), "Changelog error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}

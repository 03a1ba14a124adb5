/// mcguess error types
#[derive(Debug, thiserror::Error)]
pub enum McGuessError {
    /// Word-vector source exceeds the load ceiling
    #[error("Size limit exceeded: {0}")]
    SizeLimit(String),

    /// Malformed word-vector header or record
    #[error("Format error: {0}")]
    Format(String),

    /// Word-vector data ended before the header's promised records
    #[error("Truncated data: {0}")]
    Truncated(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stop-word list or POS lexicon could not be loaded
    #[error("Resource error: {0}")]
    Resource(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Well-formed request that no answer could be scored for
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl McGuessError {
    /// Create size limit error
    pub fn size_limit<S: Into<String>>(msg: S) -> Self {
        Self::SizeLimit(msg.into())
    }

    /// Create format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    /// Create truncated data error
    pub fn truncated<S: Into<String>>(msg: S) -> Self {
        Self::Truncated(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create resource error
    pub fn resource<S: Into<String>>(msg: S) -> Self {
        Self::Resource(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create unprocessable error
    pub fn unprocessable<S: Into<String>>(msg: S) -> Self {
        Self::Unprocessable(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors raised while loading startup resources
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::SizeLimit(_)
                | Self::Format(_)
                | Self::Truncated(_)
                | Self::Config(_)
                | Self::Resource(_)
        )
    }
}

// HTTP response conversion
impl McGuessError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::Unprocessable(_) => 422,
            Self::SizeLimit(_) => 500,
            Self::Format(_) => 500,
            Self::Truncated(_) => 500,
            Self::Config(_) => 500,
            Self::Resource(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_keep_client_failures_apart() {
        assert_eq!(McGuessError::invalid_input("no question").status_code(), 400);
        assert_eq!(McGuessError::unprocessable("no answer").status_code(), 422);
        assert_eq!(McGuessError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_startup_fatal_classification() {
        assert!(McGuessError::format("no space").is_startup_fatal());
        assert!(McGuessError::size_limit("3 GiB").is_startup_fatal());
        assert!(!McGuessError::unprocessable("no answer").is_startup_fatal());
    }
}

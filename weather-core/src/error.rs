use thiserror::Error;

/// Why a position could not be obtained.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geolocation is not available on this platform")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single weather request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Parse(_) => None,
        }
    }
}

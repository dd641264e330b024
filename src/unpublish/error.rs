use thiserror::Error;

/// Usage line shown alongside every usage error
pub const USAGE: &str = "npm-unpublish [<@scope>/]<pkg>[@<version>]";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Revision conflict: {0}")]
    Conflict(String),

    #[error("This operation requires a one-time password")]
    OtpRequired,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} has no \"name\" field")]
    MissingName(String),
}

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("one-time password required but no way to prompt for it")]
    Unavailable,

    #[error("one-time password was empty")]
    Empty,

    #[error("Failed to read one-time password: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum UnpublishError {
    #[error("{0}\n\nUsage: {usage}", usage = USAGE)]
    Usage(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error("No _rev found in {0}")]
    Integrity(String),

    #[error("Failed to write status: {0}")]
    Output(#[from] std::io::Error),
}

impl UnpublishError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

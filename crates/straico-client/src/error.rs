/// Client-specific result type
pub type Result<T> = std::result::Result<T, StraicoError>;

/// Errors from the Straico client
#[derive(Debug, thiserror::Error)]
pub enum StraicoError {
    /// Client setup is unusable (empty key or URL, no derivable host)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Caller supplied malformed operation arguments
    #[error("invalid request: {0}")]
    Validation(String),

    /// Network, connection, or timeout failure
    #[error("Straico API request failed: {source}")]
    Transport {
        /// HTTP status, if a response head was received before the failure
        status: Option<u16>,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Response body is not valid JSON
    #[error("failed to decode Straico API response: {source} | body (truncated): {excerpt}")]
    Decode {
        /// HTTP status of the response
        status: u16,
        /// At most 500 characters of the raw body
        excerpt: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Service reported `success: false`
    #[error("Straico API error ({status}): {message}")]
    Api {
        /// HTTP status of the response
        status: u16,
        /// Message reported by the service
        message: String,
    },
}

impl StraicoError {
    /// HTTP status associated with this error, when a response was received
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Decode { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Config(_) | Self::Validation(_) => None,
        }
    }

    /// Whether the failure happened on the wire rather than in the payload
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Build a validation error
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for StraicoError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            status: source.status().map(|s| s.as_u16()),
            source,
        }
    }
}

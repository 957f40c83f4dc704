//! Error types for the Audioscrobbler API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Audioscrobbler web service.
#[derive(Debug, Error)]
pub enum ScrobblerError {
    /// Malformed caller input (empty method name, empty parameter key).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Credentials required for the request were never configured.
    ///
    /// Raised when no API key is set, or when a signed request is built
    /// without a shared secret.
    #[error("not configured: {0}")]
    Configuration(String),

    /// A parameter value has no text form (e.g. a NaN float).
    #[error("cannot encode parameter `{key}`: {reason}")]
    Encoding {
        /// Parameter key whose value failed to convert.
        key: String,
        /// Why the value could not be rendered.
        reason: String,
    },

    /// No constructor is registered for the resolved entity identifier.
    #[error("unknown entity `{name}` (resolved from `{logical}`)")]
    UnknownEntity {
        /// Logical name as it travelled with the request, e.g. `top_tags`.
        logical: String,
        /// Canonical identifier derived from it, e.g. `TopTags`.
        name: String,
    },

    /// A typed fetch resolved to an entity of a different type.
    #[error("expected entity `{expected}`, got `{found}`")]
    EntityType {
        expected: &'static str,
        found: &'static str,
    },

    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, usually an `lfm` error envelope.
        body: String,
    },

    /// The service returned `<lfm status="failed">`.
    ///
    /// Common codes:
    /// - `6`: invalid parameters / not found
    /// - `9`: invalid session key
    /// - `10`: invalid API key
    /// - `13`: invalid method signature
    /// - `29`: rate limit exceeded
    #[error("API error (code {code}): {message}")]
    Api {
        /// Audioscrobbler error code (not HTTP status).
        code: i64,
        /// Human-readable error message from the service.
        message: String,
    },

    /// The response body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    /// An element could not be shaped into the target entity.
    #[error("cannot build entity `{entity}`: {source}")]
    Materialize {
        /// Canonical identifier of the target type.
        entity: &'static str,
        source: serde_json::Error,
    },

    /// The credentials file is not valid JSON.
    #[error("invalid credentials file: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error (credential read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors (e.g. missing config directory).
    #[error("{0}")]
    Other(String),
}

impl ScrobblerError {
    /// Whether the error came from the transport (network or HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

/// Convenience alias for `Result<T, ScrobblerError>`.
pub type Result<T> = std::result::Result<T, ScrobblerError>;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (unreachable host, timeout,
    /// connection reset, TLS failure).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for logging.
        body: String,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// The HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the portal API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Machine-readable code from the error body, e.g. `NOT_FOUND`.
        code: Option<String>,
        message: String,
    },

    /// An authenticated call was made before [`login`](crate::PortalClient::login).
    #[error("Not logged in")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

use lb_core::service::ServiceError;
use thiserror::Error;

/// Errors produced by [`crate::HttpLeadService`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connect, TLS, timeout or body-read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base url '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => ServiceError::Http(e.to_string()),
            ClientError::Status { status, message } => ServiceError::Status { status, message },
            ClientError::Decode(e) => ServiceError::Decode(e.to_string()),
            ClientError::InvalidBaseUrl(url) => ServiceError::Http(format!("invalid base url '{url}'")),
        }
    }
}

pub mod gateway;
pub mod identity;
pub mod payment;

/// Failure taxonomy shared by every client-side component.
///
/// `Validation` never reaches the network; `Server` carries the backend's
/// `detail` message verbatim when one was provided.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected the request ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Payment provider failed: {0}")]
    Provider(String),

    #[error("Session expired")]
    SessionExpired,
}

impl ClientError {
    /// Generic message for a non-2xx response without a usable body.
    pub fn from_status(status: u16) -> Self {
        ClientError::Server {
            status,
            message: format!("HTTP error! status: {}", status),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

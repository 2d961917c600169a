use thiserror::Error;

/// Failures surfaced by the outbound messaging and marketing clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure or an undecodable response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The messaging send endpoint answered with something other than 200.
    #[error("failed to send message, status: {status}")]
    Status { status: u16 },
    /// A marketing envelope carried a non-zero code.
    #[error("API error: {message} (code: {code})")]
    Remote { code: i64, message: String },
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "transport",
            ApiError::Status { .. } => "status",
            ApiError::Remote { .. } => "remote",
        }
    }
}

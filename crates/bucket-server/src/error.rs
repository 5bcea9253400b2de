use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bucket_gate::AuthError;
use bucket_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),

    #[error("invalid file: {0}")]
    InvalidFile(String),

    #[error("missing multipart field `{0}`")]
    MissingField(&'static str),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidFile(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(err) => match err {
                StoreError::EmptyIdentifier | StoreError::InvalidIdentifier(_) => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::ReadFailure(_)
                | StoreError::WriteFailure { .. }
                | StoreError::RootUnavailable(_)
                | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client. Causes stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthorized(AuthError::Missing) => "Authorization header is missing",
            Self::Unauthorized(_) => "Invalid API key",
            Self::UnsupportedMethod(_) => "Unsupported method",
            Self::InvalidFile(_) | Self::MissingField(_) => "Invalid file",
            Self::PayloadTooLarge { .. } => "File too large",
            Self::Store(err) => match err {
                StoreError::EmptyIdentifier => "File hash is required",
                StoreError::InvalidIdentifier(_) => "Invalid file hash",
                StoreError::NotFound(_) => "File not found",
                StoreError::ReadFailure(_) => "Failed to hash file",
                StoreError::WriteFailure { .. } => "Failed to save file",
                StoreError::RootUnavailable(_) | StoreError::Io(_) => "Internal server error",
            },
            Self::Config(_) | Self::Io(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {self}");
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {self}");
        }
        (status, self.public_message()).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

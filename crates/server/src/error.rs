use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use photorepo_album::AlbumError;
use photorepo_asset::AssetError;

/// Errors that can occur when running the photorepo server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed request body.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Album(#[from] AlbumError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Asset(AssetError::Validation(_))
            | Self::Album(AlbumError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Asset(AssetError::NotFound(_)) | Self::Album(AlbumError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Album(AlbumError::IdCollision(_)) => StatusCode::CONFLICT,
            Self::Config(_) | Self::Io(_) | Self::Asset(_) | Self::Album(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use photorepo_core::ValidationError;

    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                ServerError::Album(AlbumError::Validation(ValidationError::EmptyAlbumName)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Asset(AssetError::Validation(ValidationError::NameTooShort(
                    "x".into(),
                ))),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Asset(AssetError::NotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::Album(AlbumError::NotFound("1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::Album(AlbumError::IdCollision("1".into())),
                StatusCode::CONFLICT,
            ),
            (
                ServerError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }
}

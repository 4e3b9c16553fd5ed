use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please enter details.")]
    InvalidInput,

    #[error("User already exists!")]
    AlreadyExists,

    #[error("Invalid Username/Password")]
    InvalidCredentials,

    #[error("not logged in")]
    Unauthorized,

    #[error("no task at index {0}")]
    NotFound(usize),

    #[error("store file {} is not valid JSON; refusing to overwrite it", .path.display())]
    CorruptStore { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CorruptStore { .. }
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Errors a user can fix by re-entering the form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput | AppError::AlreadyExists | AppError::InvalidCredentials
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_client_statuses() {
        assert_eq!(AppError::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound(3).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn corrupt_store_is_a_server_error() {
        let err = AppError::CorruptStore {
            path: PathBuf::from("data/users.json"),
        };
        assert!(err.status().is_server_error());
        assert!(!err.is_user_facing());
        assert!(err.to_string().contains("data/users.json"));
    }
}

//! Error types shared by both apps.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::templates;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// No active session.
    #[error("login required")]
    LoginRequired,

    /// The record belongs to another user.
    #[error("not authorized")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid form input.
    #[error("{0}")]
    Validation(String),

    /// Unique constraint clash, e.g. a taken username.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Spreadsheet could not be written or read.
    #[error("{0}")]
    Spreadsheet(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Password(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::LoginRequired | AppError::Forbidden => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Spreadsheet(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::LoginRequired => return Redirect::to("/login").into_response(),
            AppError::Forbidden => return Redirect::to("/").into_response(),
            _ => {}
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = if status.is_server_error() {
            "Something went wrong. Please try again.".to_string()
        } else {
            self.to_string()
        };

        (status, Html(templates::error_page(status, &message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

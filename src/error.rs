//! Client-facing error taxonomy.
//!
//! Every failure in the auth flows ends up as one of these variants, and
//! [`IntoResponse`] is the single place that decides what the client sees.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

pub const WRONG_SIGNIN_DETAILS: &str = "wrong signin details";
pub const USER_NOT_FOUND: &str = "user not found";
pub const SOMETHING_WENT_WRONG: &str = "something went wrong";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email {0} already registered")]
    DuplicateEmail(String),

    #[error("{}", WRONG_SIGNIN_DETAILS)]
    InvalidCredentials,

    #[error("{}", USER_NOT_FOUND)]
    UserNotFound,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("token error: {0}")]
    Token(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Store(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand to the client. Internal detail never leaves this type.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                SOMETHING_WENT_WRONG.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorBody {
            error: self.client_message(),
        });
        (status, body).into_response()
    }
}

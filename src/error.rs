/// Error taxonomy for the registration flow
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::Role;
use crate::store::{CodecError, StoreError};

pub const MSG_METHOD_NOT_ALLOWED: &str = "Only POST is accepted";
pub const MSG_INVALID_ROLE: &str = "Role must be one of resellerpanel, adminpanel, pantherpanel, owner";
pub const MSG_MISSING_CREDENTIALS: &str = "Role, username and password are required";
pub const MSG_DUPLICATE_USERNAME: &str = "Username is already registered";
pub const MSG_INTERNAL: &str = "Failed to save the account, please try again later";
pub const MSG_CREATED: &str = "Account created successfully";

/// Every way a registration request can end without creating an account.
/// All variants are terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid role: '{0}'")]
    InvalidRole(String),

    #[error("Missing username or password")]
    MissingCredentials,

    #[error("Username '{username}' already registered for role {role}")]
    DuplicateUsername { role: Role, username: String },

    /// Reading the record set failed for a reason other than "not found".
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("Stored record set is corrupt: {0}")]
    CorruptStore(#[source] CodecError),

    /// Includes stale-token rejections from a concurrent writer.
    #[error("Record store write failed: {0}")]
    StoreWriteFailed(#[source] StoreError),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl RegistrationError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegistrationError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RegistrationError::InvalidRole(_) | RegistrationError::MissingCredentials => StatusCode::BAD_REQUEST,
            RegistrationError::DuplicateUsername { .. } => StatusCode::CONFLICT,
            RegistrationError::StoreUnavailable(_)
            | RegistrationError::CorruptStore(_)
            | RegistrationError::StoreWriteFailed(_)
            | RegistrationError::HashingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller. Upstream detail never leaves the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            RegistrationError::MethodNotAllowed => MSG_METHOD_NOT_ALLOWED,
            RegistrationError::InvalidRole(_) => MSG_INVALID_ROLE,
            RegistrationError::MissingCredentials => MSG_MISSING_CREDENTIALS,
            RegistrationError::DuplicateUsername { .. } => MSG_DUPLICATE_USERNAME,
            _ => MSG_INTERNAL,
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Registration failed");
        } else {
            tracing::warn!(error = %self, "Registration rejected");
        }
        (status, Json(serde_json::json!({ "error": self.public_message() }))).into_response()
    }
}

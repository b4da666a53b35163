use serde_json::Value;
use std::fmt;

use crate::error::RegistrationError;
use crate::models::Role;

/// Credentials as they arrived in the request body.
///
/// The body is parsed leniently: an empty or malformed body, or fields that
/// are not strings, simply leave the credentials absent.
#[derive(Default, Clone)]
pub struct RegisterBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(_) => return Self::default(),
        };
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            username: field("username"),
            password: field("password"),
        }
    }
}

impl fmt::Debug for RegisterBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterBody")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A request that passed validation: known role, trimmed non-empty username,
/// non-empty password.
#[derive(Clone)]
pub struct RegistrationRequest {
    pub role: Role,
    pub username: String,
    pub password: String,
}

impl RegistrationRequest {
    /// Checks run in order: role, then username, then password.
    pub fn validate(
        role: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        let raw_role = role.unwrap_or_default();
        let role = raw_role
            .parse::<Role>()
            .map_err(|_| RegistrationError::InvalidRole(raw_role.to_string()))?;

        let username = username.map(str::trim).unwrap_or_default();
        if username.is_empty() {
            return Err(RegistrationError::MissingCredentials);
        }

        let password = password.unwrap_or_default();
        if password.is_empty() {
            return Err(RegistrationError::MissingCredentials);
        }

        Ok(Self {
            role,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_body(role: Option<&str>, body: &RegisterBody) -> Result<Self, RegistrationError> {
        Self::validate(role, body.username.as_deref(), body.password.as_deref())
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("role", &self.role)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

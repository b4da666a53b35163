use crate::error::RegistrationError;

/// bcrypt with a fresh salt, run on the blocking pool so request tasks keep moving.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, RegistrationError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| RegistrationError::HashingFailed(e.to_string()))?
        .map_err(|e| RegistrationError::HashingFailed(e.to_string()))
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    bcrypt::verify(candidate, stored).unwrap_or(false)
}

pub mod password_service;
pub mod registration_service;

// Re-export commonly used functions
pub use password_service::{hash_password, verify_password};
pub use registration_service::RegistrationService;

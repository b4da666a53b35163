use std::sync::Arc;

use crate::services::RegistrationService;

/// Shared by every request. Holds no mutable state; all state lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegistrationService>,
}

impl AppState {
    pub fn new(registration: RegistrationService) -> Self {
        Self {
            registration: Arc::new(registration),
        }
    }
}

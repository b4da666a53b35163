pub mod app_state;
pub mod registration_request;
pub mod role;
pub mod role_record_set;
pub mod user_record;

pub use app_state::AppState;
pub use registration_request::{RegisterBody, RegistrationRequest};
pub use role::{Role, UnknownRole};
pub use role_record_set::RoleRecordSet;
pub use user_record::{format_timestamp, UserRecord};

pub mod register;

pub use register::{method_not_allowed, register_post};

mod errors;
mod registration_service;

pub use errors::{RegistrationError, Result};
pub use registration_service::register_for_event;

mod errors;
mod return_service;

pub use errors::{ReturnError, Result};
pub use return_service::{ReturnReceipt, return_item};

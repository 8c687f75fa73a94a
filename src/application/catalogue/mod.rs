mod search_service;

pub use search_service::{SearchError, search_titles};

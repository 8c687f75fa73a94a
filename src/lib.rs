pub mod adapters;
pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod library;
pub mod ports;

pub use library::{Library, LibraryError, RETURN_REJECTED};

pub mod catalogue;
pub mod checkout;
pub mod commands;
pub mod errors;
pub mod fine;
pub mod holding_type;
pub mod schedule;
pub mod value_objects;

pub use catalogue::*;
pub use checkout::*;
pub use errors::*;
pub use fine::*;
pub use holding_type::*;
pub use schedule::*;
pub use value_objects::*;

pub mod config;
pub mod customer;
pub mod visit;

pub use config::*;
pub use customer::*;
pub use visit::*;

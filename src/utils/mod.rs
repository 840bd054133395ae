pub mod date;
pub mod error;
pub mod maps;
pub mod path;

pub use error::{AppError, AppResult};

//! Utility modules

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub mod analyze;
pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod images;
pub mod results;
pub mod state;

pub use error::{ApiError, ApiResult};

pub mod cli;
pub mod config;
pub mod error;
pub mod file_remote;
pub mod observability;

pub use crate::config::Settings;
pub use crate::error::AppError;
pub use crate::file_remote::FileRemote;

pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod recon;

pub use config::Config;
pub use error::Error;
pub use error::Result;

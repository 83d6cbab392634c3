pub mod app_config;
pub mod config;
pub mod products;
pub mod sources;

pub use app_config::AppConfig;
pub use config::load_app_config;
pub use products::{BasicRecord, ExtendedRecord, ProductRecord, PLACEHOLDER};
pub use sources::{Column, Schema, SourceId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown source \"{0}\" (expected cando or watts)")]
    UnknownSource(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

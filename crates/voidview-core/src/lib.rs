//! VoidView Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the NASA client, the image pipeline and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AppConfig, BaseConfig, Config, ImagingConfig, UpstreamConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};

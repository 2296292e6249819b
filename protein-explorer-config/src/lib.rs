//! Configuration system for the protein explorer.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for the explorer front-end. It includes:
//!
//! - The [`Config`] struct and its YAML persistence
//! - Default value functions used by `#[serde(default = ...)]`
//! - The [`LogLevel`] setting shared with the binary's logger
//! - Typed [`ConfigError`] variants for library consumers

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;

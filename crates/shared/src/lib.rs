//! Shared identifiers, errors, and configuration for Finsight.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for companies and clusters
//! - Application-wide error types with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

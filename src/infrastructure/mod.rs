//! Infrastructure layer module
//!
//! This module contains the outer surfaces of the service:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - HTTP transport (axum)

pub mod config;
pub mod http;
pub mod logging;

//! Domain models.

pub mod config;
pub mod user;

pub use config::{CacheConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig};
pub use user::{EntityId, User};

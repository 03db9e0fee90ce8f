//! user-cache - read-through / write-through entity cache
//!
//! Serves user records from an in-process cache backed by a keyed store.
//! Reads populate the cache on a miss, saves refresh it with the stored
//! record, and deletes invalidate it.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the store/cache ports
//! - **Adapters** (`adapters`): SQLite and in-memory stores, moka cache
//! - **Service Layer** (`services`): The cached entity service
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, HTTP
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use user_cache::adapters::memory::InMemoryUserRepository;
//! use user_cache::{User, UserService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
//!     let saved = service.save(User::new("Ada")).await?;
//!     assert!(service.get(saved.id.unwrap()).await?.is_some());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{CacheConfig, Config, DatabaseConfig, EntityId, LoggingConfig, User};
pub use domain::ports::{CacheStore, Entity, EntityStore};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CacheStats, CacheStatsSnapshot, CachedEntityService, DynUserStore, UserService};

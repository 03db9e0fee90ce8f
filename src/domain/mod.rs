//! Domain layer for the user cache service
//!
//! This module contains the entity model, domain errors and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};

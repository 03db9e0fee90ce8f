//! HTTP transport for the user service.
//!
//! Routes:
//! - `GET /users/{id}`: 200 or 404
//! - `POST /users`: 201
//! - `DELETE /users/{id}`: 204
//! - `GET /health`: 200 with cache counters

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use handlers::{AppState, HealthResponse, SaveUserRequest};
pub use server::{build_service, router, serve};

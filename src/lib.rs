//! Library crate for secret-keyword-back, exposing modules for binaries and integration tests.

/// Runtime configuration loaded at startup.
pub mod config;
mod dto;
mod error;
/// Question generator abstraction and backends.
pub mod generator;
/// HTTP route trees.
pub mod routes;
/// Service layer between routes and state.
pub mod services;
/// Shared application state and the quiz domain.
pub mod state;

//! Rust MVC Starter - Server-rendered site with request-scoped controllers
//!
//! This crate provides a controller base for server-rendered pages on Axum:
//! memoized per-request service lookup, localization, partial views
//! rendered to strings, and notifications that survive one redirect.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and the service registry
//! - **infra**: Infrastructure concerns (repositories, Redis, localization)
//! - **mvc**: Request-scoped controller, views and notifications
//! - **api**: Handlers, templates, middleware, and routes
//! - **utils**: Utility functions and helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Verbose logging on another port
//! cargo run -- -v serve --port 8080
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod mvc;
pub mod services;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use mvc::{ActionResult, Controller};

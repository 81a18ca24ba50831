//! API layer - HTTP handlers, views and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Controller handlers
//! - Page views (askama templates)
//! - Middleware (flash carrier, HTTPS requirement, theme)
//! - Route definitions

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

pub use routes::create_router;
pub use state::AppState;

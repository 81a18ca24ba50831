//! HTTP request handlers, one module per controller.

pub mod home_handler;
pub mod note_handler;
pub mod security_handler;

pub use home_handler::home_routes;
pub use note_handler::note_routes;
pub use security_handler::security_routes;

//! Utility functions and helpers.

pub mod naming;

pub use naming::{is_route_name, to_kebab_case, to_pascal_case};

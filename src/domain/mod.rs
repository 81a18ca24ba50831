//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod aggregate;
pub mod note;

pub use aggregate::AggregateRoot;
pub use note::{Note, NoteForm};

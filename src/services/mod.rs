//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and are handed to controllers through the
//! type-keyed `ServiceRegistry`.

pub mod container;
mod note_service;

// Service Container
pub use container::{Capability, Instance, Resolver, ServiceRegistry};

// Service traits and implementations
pub use note_service::{NoteManager, NoteService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockResolver;

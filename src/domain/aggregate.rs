//! Aggregate root marker.
//!
//! DDD: an aggregate root owns an independent identity and lifecycle and is
//! the unit a repository persists.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Entity with its own identity, suitable for a repository.
pub trait AggregateRoot: Clone + Debug + Send + Sync + 'static {
    /// Identity type
    type Id: Clone + Debug + Display + Eq + Ord + Hash + Send + Sync + 'static;

    /// Identity of this aggregate
    fn id(&self) -> &Self::Id;
}

//! Base repository trait for aggregate roots.
//!
//! Handlers never depend on a storage engine directly; they resolve an
//! `Arc<dyn Repository<E>>` from the service container.

use async_trait::async_trait;

use crate::domain::AggregateRoot;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// CRUD operations over one aggregate type.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Repository<E: AggregateRoot>: Send + Sync {
    /// Find aggregate by identity
    async fn find_by_id(&self, id: &E::Id) -> AppResult<Option<E>>;

    /// List all aggregates ordered by identity
    async fn list(&self) -> AppResult<Vec<E>>;

    /// Insert or replace an aggregate
    async fn save(&self, entity: E) -> AppResult<E>;

    /// Delete by identity, returning whether anything was removed
    async fn delete(&self, id: &E::Id) -> AppResult<bool>;

    /// Count stored aggregates
    async fn count(&self) -> AppResult<usize>;
}

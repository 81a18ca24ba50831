//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Repositories for aggregate roots
//! - Redis cache and the cross-request flash store
//! - Resource-file localization
//! - Error reporting

pub mod cache;
pub mod flash_store;
pub mod localization;
pub mod logging;
pub mod repositories;

pub use cache::Cache;
pub use flash_store::{FlashEntries, FlashStore, MemoryFlashStore, RedisFlashStore};
pub use localization::{format_positional, Culture, Localizer, ResourceLocalizer};
pub use logging::{ErrorLogger, TracingErrorLogger};
pub use repositories::{MemoryRepository, Repository};

#[cfg(any(test, feature = "test-utils"))]
pub use flash_store::MockFlashStore;
#[cfg(any(test, feature = "test-utils"))]
pub use localization::MockLocalizer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockRepository;

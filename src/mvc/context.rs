//! Request-scoped service cache.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::services::{Capability, Instance, Resolver};

/// Memoizes resolved services for the lifetime of one request.
///
/// The first lookup of a capability asks the resolver; later lookups return
/// a clone of the stored value, so `Arc` services are pointer-identical
/// within the request. Nothing is shared between requests.
pub struct ServiceCache {
    resolver: Arc<dyn Resolver>,
    instances: HashMap<Capability, Instance>,
}

impl ServiceCache {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            instances: HashMap::new(),
        }
    }

    /// Resolve `T`, consulting the resolver at most once per request.
    pub fn get<T: Clone + Send + Sync + 'static>(&mut self) -> AppResult<T> {
        let capability = Capability::of::<T>();

        if !self.instances.contains_key(&capability) {
            let instance = self.resolver.resolve(capability)?;
            if !instance.is::<T>() {
                tracing::error!(
                    capability = capability.name(),
                    "Resolver returned an instance of the wrong type"
                );
                return Err(AppError::Resolution {
                    capability: capability.name(),
                });
            }
            tracing::trace!(capability = capability.name(), "Resolved service for request");
            self.instances.insert(capability, instance);
        }

        self.instances
            .get(&capability)
            .and_then(|instance| instance.downcast_ref::<T>())
            .cloned()
            .ok_or(AppError::Resolution {
                capability: capability.name(),
            })
    }

    /// Number of capabilities resolved so far in this request
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockResolver, ServiceRegistry};

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct Fixed(u64);

    impl Clock for Fixed {
        fn now(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_same_instance_within_request() {
        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve()
            .withf(|capability| *capability == Capability::of::<Arc<dyn Clock>>())
            .times(1)
            .returning(|_| Ok(Box::new(Arc::new(Fixed(7)) as Arc<dyn Clock>)));

        let mut cache = ServiceCache::new(Arc::new(resolver));
        let a = cache.get::<Arc<dyn Clock>>().unwrap();
        let b = cache.get::<Arc<dyn Clock>>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.now(), 7);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_transient_registration_is_stable_per_request_only() {
        let registry: Arc<dyn Resolver> = Arc::new(
            ServiceRegistry::new()
                .transient::<Arc<dyn Clock>, _>(|_| Ok(Arc::new(Fixed(1)) as Arc<dyn Clock>)),
        );

        let mut first_request = ServiceCache::new(registry.clone());
        let mut second_request = ServiceCache::new(registry);

        let a1 = first_request.get::<Arc<dyn Clock>>().unwrap();
        let a2 = first_request.get::<Arc<dyn Clock>>().unwrap();
        let b = second_request.get::<Arc<dyn Clock>>().unwrap();

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }

    #[test]
    fn test_resolution_failure_propagates_and_is_not_cached() {
        let mut resolver = MockResolver::new();
        resolver.expect_resolve().times(2).returning(|capability| {
            Err(AppError::Resolution {
                capability: capability.name(),
            })
        });

        let mut cache = ServiceCache::new(Arc::new(resolver));
        assert!(matches!(cache.get::<Arc<dyn Clock>>(), Err(AppError::Resolution { .. })));
        assert!(matches!(cache.get::<Arc<dyn Clock>>(), Err(AppError::Resolution { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_wrong_instance_type_is_rejected() {
        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(Box::new("not a clock".to_string())));

        let mut cache = ServiceCache::new(Arc::new(resolver));
        assert!(matches!(cache.get::<Arc<dyn Clock>>(), Err(AppError::Resolution { .. })));
    }
}

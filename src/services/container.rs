//! Service Container - Type-keyed dependency resolution.
//!
//! SOLID (DIP): Handlers depend on capability traits, never on concrete
//! implementations. The container maps each capability type to a factory.
//!
//! Features:
//! - Singleton registrations (one shared instance)
//! - Transient registrations (factory runs on every resolve)
//! - Factories may resolve their own dependencies from the container
//! - Thread-safe: shared across requests behind an `Arc`

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A type-erased resolved service instance.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Identifies a requested capability by its Rust type.
#[derive(Clone, Copy)]
pub struct Capability {
    id: TypeId,
    name: &'static str,
}

impl Capability {
    /// Capability for the type `T` (usually `Arc<dyn SomeTrait>`).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human readable type name, for logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Dependency resolver trait.
///
/// Returns a fresh or shared instance for the requested capability, or
/// `AppError::Resolution` when nothing is registered for it.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Resolver: Send + Sync {
    fn resolve(&self, capability: Capability) -> AppResult<Instance>;
}

type Factory = Box<dyn Fn(&ServiceRegistry) -> AppResult<Instance> + Send + Sync>;

/// Concrete resolver backed by registered factories.
#[derive(Default)]
pub struct ServiceRegistry {
    factories: HashMap<Capability, Factory>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance. Every resolve hands out a clone of it,
    /// so `Arc` services stay pointer-identical across requests.
    pub fn singleton<T>(mut self, instance: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.factories.insert(
            Capability::of::<T>(),
            Box::new(move |_: &ServiceRegistry| {
                Ok(Box::new(instance.clone()) as Instance)
            }),
        );
        self
    }

    /// Register a factory that builds a new instance on every resolve.
    pub fn transient<T, F>(mut self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> AppResult<T> + Send + Sync + 'static,
    {
        self.factories.insert(
            Capability::of::<T>(),
            Box::new(move |registry: &ServiceRegistry| {
                factory(registry).map(|value| Box::new(value) as Instance)
            }),
        );
        self
    }

    /// Typed resolve, used by factories to pull their dependencies.
    pub fn get<T: Send + Sync + 'static>(&self) -> AppResult<T> {
        let capability = Capability::of::<T>();
        self.resolve(capability)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| AppError::Resolution {
                capability: capability.name(),
            })
    }

    /// Check whether a capability is registered
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.factories.contains_key(&Capability::of::<T>())
    }

    /// Number of registered capabilities
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Resolver for ServiceRegistry {
    fn resolve(&self, capability: Capability) -> AppResult<Instance> {
        let factory = self.factories.get(&capability).ok_or_else(|| {
            tracing::warn!(capability = capability.name(), "No registration for capability");
            AppError::Resolution {
                capability: capability.name(),
            }
        })?;

        factory(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct Loud {
        inner: Arc<dyn Greeter>,
    }

    impl Greeter for Loud {
        fn greet(&self) -> String {
            self.inner.greet().to_uppercase()
        }
    }

    #[test]
    fn test_singleton_returns_same_instance() {
        let registry = ServiceRegistry::new().singleton::<Arc<dyn Greeter>>(Arc::new(English));

        let a = registry.get::<Arc<dyn Greeter>>().unwrap();
        let b = registry.get::<Arc<dyn Greeter>>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.greet(), "hello");
    }

    #[test]
    fn test_transient_builds_new_instance_each_time() {
        let registry = ServiceRegistry::new()
            .transient::<Arc<dyn Greeter>, _>(|_| Ok(Arc::new(English) as Arc<dyn Greeter>));

        let a = registry.get::<Arc<dyn Greeter>>().unwrap();
        let b = registry.get::<Arc<dyn Greeter>>().unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_factory_resolves_dependencies() {
        struct Shout(Arc<dyn Greeter>);

        let registry = ServiceRegistry::new()
            .singleton::<Arc<dyn Greeter>>(Arc::new(English))
            .transient::<Arc<Shout>, _>(|registry| {
                let inner = registry.get::<Arc<dyn Greeter>>()?;
                Ok(Arc::new(Shout(Arc::new(Loud { inner }))))
            });

        let shout = registry.get::<Arc<Shout>>().unwrap();
        assert_eq!(shout.0.greet(), "HELLO");
    }

    #[test]
    fn test_missing_registration_is_resolution_error() {
        let registry = ServiceRegistry::new();

        let err = registry.get::<Arc<dyn Greeter>>().err().unwrap();
        match err {
            AppError::Resolution { capability } => assert!(capability.contains("Greeter")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_capability_identity() {
        assert_eq!(Capability::of::<Arc<dyn Greeter>>(), Capability::of::<Arc<dyn Greeter>>());
        assert_ne!(Capability::of::<Arc<dyn Greeter>>(), Capability::of::<Arc<English>>());
        assert!(ServiceRegistry::new().is_empty());
    }
}

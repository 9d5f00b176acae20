use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// A registered service value.
///
/// The registry never inspects values; it only holds a shared reference.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Errors returned by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No entry exists under `name`.
    #[error("Service \"{name}\" does not exist.")]
    NotFound { name: String },

    /// An entry exists under `name` but holds a different type.
    #[error("Service \"{name}\" is not a `{expected}`.")]
    TypeMismatch { name: String, expected: &'static str },
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Named service container.
///
/// `Registry` is a cheap handle: clones share the same underlying map. Every
/// operation holds a single lock around the whole map, so a lookup racing an
/// `add` or `remove` observes either the old entry or the new one.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Arc<Mutex<HashMap<String, Service>>>,
}

impl Registry {
    /// Creates an empty, isolated registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Returns the service registered under `name`.
    pub fn get(&self, name: &str) -> Result<Service, RegistryError> {
        let found = self.entries.lock().get(name).cloned();

        found.ok_or_else(|| {
            log::debug!("service lookup missed: {name:?}");
            RegistryError::NotFound {
                name: name.to_string(),
            }
        })
    }

    /// Returns the service registered under `name`, downcast to `T`.
    pub fn get_as<T>(&self, name: &str) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        self.get(name)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Stores `service` under `name`, replacing any previous entry.
    pub fn add<T>(&self, name: impl Into<String>, service: T)
    where
        T: Any + Send + Sync,
    {
        self.add_shared(name, Arc::new(service));
    }

    /// Stores an already shared service under `name`, replacing any previous entry.
    ///
    /// The stored handle points at the same allocation as `service`.
    pub fn add_shared<T>(&self, name: impl Into<String>, service: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        let name = name.into();
        let replaced = self.entries.lock().insert(name.clone(), service).is_some();
        log::trace!("service {name:?} added (replaced: {replaced})");
    }

    /// Removes the entry under `name`, if any.
    pub fn remove(&self, name: &str) {
        if self.entries.lock().remove(name).is_some() {
            log::trace!("service {name:?} removed");
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        log::trace!("registry cleared ({count} entries)");
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns the registered names in unspecified order.
    pub fn names(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::registry::{Registry, RegistryError};

/// A declared member of a consumer type that a [`Binding`] can be installed on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Member<'a> {
    /// A plain data field.
    Field(&'a str),
    /// A method. Bindings installed here contribute nothing.
    Method(&'a str),
    /// A getter/setter pair. Bindings installed here contribute nothing.
    Accessor(&'a str),
}

/// Field binding produced by [`inject`].
#[derive(Debug, Clone)]
pub struct Binding {
    name: Option<String>,
    registry: Option<Registry>,
}

/// Creates a binding that resolves `name` (or, when `None`, the declared field
/// name) through the service registry.
///
/// ```rust
/// use lunas_engine::di::{inject, Registry};
///
/// struct Audio { volume: f32 }
///
/// struct Player {
///     audio: lunas_engine::di::Injected<Audio>,
/// }
///
/// let registry = Registry::new();
/// let player = Player {
///     audio: inject(None).with_registry(&registry).field("audio"),
/// };
///
/// assert!(player.audio.get().is_err());
/// registry.add("audio", Audio { volume: 0.5 });
/// assert_eq!(player.audio.get().unwrap().volume, 0.5);
/// ```
pub fn inject(name: Option<&str>) -> Binding {
    Binding {
        name: name.map(str::to_owned),
        registry: None,
    }
}

impl Binding {
    /// Resolves through `registry` instead of [`Registry::global`].
    pub fn with_registry(mut self, registry: &Registry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Installs the binding on `member`.
    ///
    /// Only fields receive an accessor; any other member yields `None`.
    pub fn bind<T>(self, member: Member<'_>) -> Option<Injected<T>>
    where
        T: Any + Send + Sync,
    {
        match member {
            Member::Field(field) => Some(self.field(field)),
            Member::Method(_) | Member::Accessor(_) => None,
        }
    }

    /// Installs the binding on a field declared as `field_name`.
    pub fn field<T>(self, field_name: &str) -> Injected<T>
    where
        T: Any + Send + Sync,
    {
        let name = self.name.unwrap_or_else(|| field_name.to_owned());
        let registry = self.registry.unwrap_or_else(|| Registry::global().clone());

        Injected {
            name,
            registry,
            _ty: PhantomData,
        }
    }
}

/// Lazily resolved service field.
///
/// Nothing is looked up when the field is created. Every [`get`](Self::get)
/// goes back to the registry, so replacements and removals are observed by the
/// next read.
pub struct Injected<T> {
    name: String,
    registry: Registry,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Injected<T>
where
    T: Any + Send + Sync,
{
    /// Resolves the service currently registered under [`name`](Self::name).
    pub fn get(&self) -> Result<Arc<T>, RegistryError> {
        self.registry.get_as::<T>(&self.name)
    }

    /// The registry key this field resolves.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for Injected<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            registry: self.registry.clone(),
            _ty: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Injected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

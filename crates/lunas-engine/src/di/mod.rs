//! Named service registry and lazy field injection.
//!
//! - [`Registry`] maps string keys to shared service values
//! - [`inject`] builds [`Injected`] fields that resolve through a registry on every read

mod inject;
mod registry;

pub use inject::{Binding, Injected, Member, inject};
pub use registry::{Registry, RegistryError, Service};

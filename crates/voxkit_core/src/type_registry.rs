//! Type tokens and keyed factory tables
//!
//! A [`StateType`] stands in for a class token: it identifies a concrete
//! Rust type at runtime. A [`TypeRegistry`] maps the stable key of a type
//! to some factory value so that persisted data can be turned back into
//! live objects without scanning for types.

use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::BTreeMap;

use crate::key::type_key;

/// Runtime token for a concrete type
#[derive(Clone, Copy)]
pub struct StateType {
    /// The Rust TypeId
    pub type_id: TypeId,
    /// Fully qualified type name
    pub name: &'static str,
}

impl StateType {
    /// Token for a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Last path segment of the type name, generics included
    pub fn short_name(&self) -> &'static str {
        short_name(self.name)
    }

    /// The registry key for this type
    pub fn key(&self) -> String {
        crate::key::escape_type_name(self.name)
    }
}

impl PartialEq for StateType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StateType {}

impl Hash for StateType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateType").field(&self.name).finish()
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

fn short_name(full: &'static str) -> &'static str {
    // Only strip the path before any generic arguments
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// Keyed table of factories, one per registered type
pub struct TypeRegistry<F> {
    /// Map from type key to factory
    factories: BTreeMap<String, F>,
}

impl<F> TypeRegistry<F> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory for a type, returning the one it replaces
    pub fn register<T: ?Sized + 'static>(&mut self, factory: F) -> Option<F> {
        self.register_key(type_key::<T>(), factory)
    }

    /// Register a factory under an explicit key
    pub fn register_key(&mut self, key: impl Into<String>, factory: F) -> Option<F> {
        self.factories.insert(key.into(), factory)
    }

    /// Get the factory for a key
    pub fn get(&self, key: &str) -> Option<&F> {
        self.factories.get(key)
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Check if a type is registered
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.factories.contains_key(&type_key::<T>())
    }

    /// Iterate over registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Get the number of registered types
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<F> Default for TypeRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for TypeRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.factories.len())
            .finish()
    }
}

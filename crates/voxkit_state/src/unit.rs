//! State units - capturable, restorable slices of target data
//!
//! A unit copies one orthogonal piece of data (health, location, ...) out
//! of a target and can later write it back onto the same or another
//! target. Units declare which other unit *types* must be restored before
//! them; the [`DependencyGraph`](crate::graph::DependencyGraph) turns those
//! declarations into a capture/restore order.

use core::any::Any;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use voxkit_core::{Error, Result, StateType};

/// String-keyed field map exchanged with the persistence layer
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Access to a unit as [`Any`] for downcasting
pub trait AsAny: Any {
    /// Get as Any reference
    fn as_any(&self) -> &dyn Any;
}

impl<U: Any> AsAny for U {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A capturable and restorable unit of target state
///
/// Once `capture_state` returns, the unit owns its copy of the data:
/// mutating the target afterwards does not change what gets restored.
pub trait StateUnit<T: ?Sized>: AsAny {
    /// Copy the observed data out of the target
    fn capture_state(&mut self, target: &T) -> Result<()>;

    /// Write the captured data onto a target
    fn restore_state(&self, target: &mut T) -> Result<()>;

    /// Unit types that must be restored before this one
    fn restore_after(&self) -> Vec<StateType> {
        Vec::new()
    }

    /// Token of the concrete unit type
    fn state_type(&self) -> StateType {
        StateType::of::<Self>()
    }

    /// Extra type tokens this unit counts as an instance of
    ///
    /// Dependency edges match a declared type against the concrete type
    /// and every family, the way a supertype would match.
    fn families(&self) -> Vec<StateType> {
        Vec::new()
    }

    /// Whether this unit matches a declared dependency type
    fn is_instance_of(&self, ty: &StateType) -> bool {
        self.state_type() == *ty || self.families().contains(ty)
    }

    /// Persisted fields of the captured data, `None` if not persistable
    fn to_fields(&self) -> Result<Option<Fields>> {
        Ok(None)
    }
}

impl<T: ?Sized + 'static> dyn StateUnit<T> {
    /// Downcast to a concrete unit type
    pub fn downcast_ref<U: 'static>(&self) -> Option<&U> {
        self.as_any().downcast_ref()
    }
}

/// Serialize a value into a field map
///
/// The value must serialize as a map or struct.
pub fn fields_of<S: Serialize + ?Sized>(value: &S) -> Result<Fields> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(Error::Fields(
            format!("expected a map of fields, got {}", other).into_boxed_str(),
        )),
    }
}

/// Deserialize a value from a field map
pub fn from_fields<D: DeserializeOwned>(fields: &Fields) -> Result<D> {
    let map: serde_json::Map<String, serde_json::Value> =
        fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    Ok(serde_json::from_value(serde_json::Value::Object(map))?)
}

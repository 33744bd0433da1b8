//! Registry of state unit factories
//!
//! Maps the stable key of a unit type to a function that rebuilds the
//! unit from a persisted field map. The registry is an ordinary owned
//! value: build it once at startup and hand it to whatever loads
//! snapshots.

use core::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use voxkit_core::{Result, StateType, TypeRegistry};

use crate::target::{Entity, LivingEntity};
use crate::unit::{from_fields, Fields, StateUnit};
use crate::units::{
    CustomNameState, EquipmentState, FallDistanceState, FireTicksState, FlagsState, HealthState,
    LocationState, MaxHealthState, PotionEffectsState, RemainingAirState, VelocityState,
};

/// Builds a unit from persisted fields
pub type UnitFactory<T> = Box<dyn Fn(&Fields) -> Result<Box<dyn StateUnit<T>>> + Send + Sync>;

/// Keyed table of unit factories for one target type
pub struct StateRegistry<T: ?Sized> {
    types: TypeRegistry<UnitFactory<T>>,
}

impl<T: ?Sized + 'static> StateRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
        }
    }

    /// Register a factory for a unit type
    ///
    /// Registering the same type again replaces its factory.
    pub fn register<U, F>(&mut self, factory: F) -> &mut Self
    where
        U: StateUnit<T>,
        F: Fn(&Fields) -> Result<U> + Send + Sync + 'static,
    {
        let boxed: UnitFactory<T> =
            Box::new(move |fields: &Fields| -> Result<Box<dyn StateUnit<T>>> {
                Ok(Box::new(factory(fields)?))
            });

        if self.types.register::<U>(boxed).is_some() {
            debug!("Replaced state factory for {}", StateType::of::<U>());
        }
        self
    }

    /// Register a unit type that deserializes from its fields
    pub fn register_serde<U>(&mut self) -> &mut Self
    where
        U: StateUnit<T> + DeserializeOwned,
    {
        self.register::<U, _>(|fields| from_fields::<U>(fields))
    }

    /// Rebuild a unit from its key and fields
    ///
    /// Returns `None` for unknown keys; otherwise whatever the factory
    /// produced, errors included.
    pub fn deserialize(&self, key: &str, fields: &Fields) -> Option<Result<Box<dyn StateUnit<T>>>> {
        self.types.get(key).map(|factory| factory(fields))
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains(key)
    }

    /// Check if a unit type is registered
    pub fn contains_type<U: StateUnit<T>>(&self) -> bool {
        self.types.contains_type::<U>()
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys()
    }

    /// Number of registered unit types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<T: Entity + ?Sized + 'static> StateRegistry<T> {
    /// Registry with every built-in entity unit
    pub fn with_entity_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_serde::<LocationState>()
            .register_serde::<VelocityState>()
            .register_serde::<FallDistanceState>()
            .register_serde::<FireTicksState>()
            .register_serde::<CustomNameState>()
            .register_serde::<FlagsState>();
        registry
    }
}

impl<T: LivingEntity + ?Sized + 'static> StateRegistry<T> {
    /// Registry with every built-in entity and living entity unit
    pub fn with_living_defaults() -> Self {
        let mut registry = Self::with_entity_defaults();
        registry
            .register_serde::<MaxHealthState>()
            .register_serde::<HealthState>()
            .register_serde::<RemainingAirState>()
            .register_serde::<PotionEffectsState>()
            .register_serde::<EquipmentState>();
        registry
    }
}

impl<T: ?Sized + 'static> Default for StateRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for StateRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MemoryEntity;
    use voxkit_core::Error;

    #[test]
    fn test_defaults_registered() {
        let entity = StateRegistry::<MemoryEntity>::with_entity_defaults();
        let living = StateRegistry::<MemoryEntity>::with_living_defaults();

        assert_eq!(entity.len(), 6);
        assert_eq!(living.len(), 11);
        assert!(living.contains_type::<HealthState>());
        assert!(living.contains(&StateType::of::<LocationState>().key()));
    }

    #[test]
    fn test_unknown_key() {
        let registry = StateRegistry::<MemoryEntity>::with_living_defaults();
        assert!(registry.deserialize("no.such.State", &Fields::new()).is_none());
    }

    #[test]
    fn test_deserialize_fields() {
        let registry = StateRegistry::<MemoryEntity>::with_living_defaults();
        let key = StateType::of::<HealthState>().key();

        let mut fields = Fields::new();
        fields.insert("health".into(), serde_json::json!(14.0));

        let unit = registry.deserialize(&key, &fields).unwrap().unwrap();
        assert_eq!(unit.state_type(), StateType::of::<HealthState>());
        assert_eq!(unit.downcast_ref::<HealthState>().map(|h| h.health), Some(14.0));
    }

    #[test]
    fn test_factory_errors_propagate() {
        let registry = StateRegistry::<MemoryEntity>::with_living_defaults();
        let key = StateType::of::<HealthState>().key();

        let mut fields = Fields::new();
        fields.insert("health".into(), serde_json::json!("lots"));

        let result = registry.deserialize(&key, &fields).unwrap();
        assert!(matches!(result, Err(Error::Fields(_))));
    }

    #[test]
    fn test_reregister_overwrites() {
        let mut registry = StateRegistry::<MemoryEntity>::new();
        registry.register::<FireTicksState, _>(|_| Ok(FireTicksState { fire_ticks: 1 }));
        registry.register::<FireTicksState, _>(|_| Ok(FireTicksState { fire_ticks: 2 }));

        let key = StateType::of::<FireTicksState>().key();
        let unit = registry.deserialize(&key, &Fields::new()).unwrap().unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(unit.downcast_ref::<FireTicksState>().map(|s| s.fire_ticks), Some(2));
    }
}

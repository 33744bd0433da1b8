//! Saved entity states with layered defaults
//!
//! [`SavedEntityState`] knows the units that make sense for any entity;
//! [`SavedLivingEntityState`] runs those first and then adds the ones for
//! living entities. Defaults are added with `track_if_absent`, so a unit
//! tracked explicitly before `track_all` is never overridden.

use core::fmt;
use core::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use voxkit_core::Result;

use crate::snapshot::Snapshot;
use crate::target::{Entity, LivingEntity};
use crate::unit::StateUnit;
use crate::units::{
    CustomNameState, EquipmentState, FallDistanceState, FireTicksState, FlagsState, HealthState,
    LocationState, MaxHealthState, PotionEffectsState, RemainingAirState, VelocityState,
};

/// Which default units `track_all` installs
///
/// Missing fields in a config document default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub location: bool,
    pub velocity: bool,
    pub fall_distance: bool,
    pub fire_ticks: bool,
    pub custom_name: bool,
    pub flags: bool,
    /// Covers both current and maximum health
    pub health: bool,
    pub remaining_air: bool,
    pub potion_effects: bool,
    pub equipment: bool,
}

impl DefaultsConfig {
    /// Config with every default disabled
    pub fn none() -> Self {
        Self {
            location: false,
            velocity: false,
            fall_distance: false,
            fire_ticks: false,
            custom_name: false,
            flags: false,
            health: false,
            remaining_air: false,
            potion_effects: false,
            equipment: false,
        }
    }

    /// Parse from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            location: true,
            velocity: true,
            fall_distance: true,
            fire_ticks: true,
            custom_name: true,
            flags: true,
            health: true,
            remaining_air: true,
            potion_effects: true,
            equipment: true,
        }
    }
}

/// Snapshot of any entity
pub struct SavedEntityState<T: ?Sized> {
    snapshot: Snapshot<T>,
    config: DefaultsConfig,
}

impl<T: Entity + ?Sized + 'static> SavedEntityState<T> {
    /// Create an empty saved state with every default enabled
    pub fn new() -> Self {
        Self::with_config(DefaultsConfig::default())
    }

    /// Create an empty saved state
    pub fn with_config(config: DefaultsConfig) -> Self {
        Self {
            snapshot: Snapshot::new(),
            config,
        }
    }

    /// Defaults config in use
    pub fn config(&self) -> &DefaultsConfig {
        &self.config
    }

    /// Track a unit, replacing any unit of the same type
    pub fn track<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.snapshot.track(unit);
        self
    }

    /// Track a unit unless one of the same type is already tracked
    pub fn track_if_absent<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.snapshot.track_if_absent(unit);
        self
    }

    /// Track the enabled entity defaults
    pub fn track_all(&mut self) -> &mut Self {
        let config = self.config;
        let snapshot = &mut self.snapshot;

        if config.location {
            snapshot.track_if_absent(LocationState::default());
        }
        if config.velocity {
            snapshot.track_if_absent(VelocityState::default());
        }
        if config.fall_distance {
            snapshot.track_if_absent(FallDistanceState::default());
        }
        if config.fire_ticks {
            snapshot.track_if_absent(FireTicksState::default());
        }
        if config.custom_name {
            snapshot.track_if_absent(CustomNameState::default());
        }
        if config.flags {
            snapshot.track_if_absent(FlagsState::default());
        }
        self
    }

    /// Unwrap into the plain snapshot
    pub fn into_snapshot(self) -> Snapshot<T> {
        self.snapshot
    }
}

impl<T: Entity + ?Sized + 'static> Default for SavedEntityState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + ?Sized + 'static> From<Snapshot<T>> for SavedEntityState<T> {
    fn from(snapshot: Snapshot<T>) -> Self {
        Self {
            snapshot,
            config: DefaultsConfig::default(),
        }
    }
}

impl<T: ?Sized> Deref for SavedEntityState<T> {
    type Target = Snapshot<T>;

    fn deref(&self) -> &Snapshot<T> {
        &self.snapshot
    }
}

impl<T: ?Sized> DerefMut for SavedEntityState<T> {
    fn deref_mut(&mut self) -> &mut Snapshot<T> {
        &mut self.snapshot
    }
}

impl<T: ?Sized> fmt::Debug for SavedEntityState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedEntityState")
            .field("snapshot", &self.snapshot)
            .field("config", &self.config)
            .finish()
    }
}

/// Snapshot of a living entity
pub struct SavedLivingEntityState<T: ?Sized> {
    base: SavedEntityState<T>,
}

impl<T: LivingEntity + ?Sized + 'static> SavedLivingEntityState<T> {
    /// Create an empty saved state with every default enabled
    pub fn new() -> Self {
        Self::with_config(DefaultsConfig::default())
    }

    /// Create an empty saved state
    pub fn with_config(config: DefaultsConfig) -> Self {
        Self {
            base: SavedEntityState::with_config(config),
        }
    }

    /// Track a unit, replacing any unit of the same type
    pub fn track<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.base.snapshot.track(unit);
        self
    }

    /// Track a unit unless one of the same type is already tracked
    pub fn track_if_absent<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.base.snapshot.track_if_absent(unit);
        self
    }

    /// Track the entity defaults, then the enabled living defaults
    pub fn track_all(&mut self) -> &mut Self {
        self.base.track_all();

        let config = self.base.config;
        let snapshot = &mut self.base.snapshot;

        if config.health {
            snapshot.track_if_absent(MaxHealthState::default());
            snapshot.track_if_absent(HealthState::default());
        }
        if config.remaining_air {
            snapshot.track_if_absent(RemainingAirState::default());
        }
        if config.potion_effects {
            snapshot.track_if_absent(PotionEffectsState::default());
        }
        if config.equipment {
            snapshot.track_if_absent(EquipmentState::default());
        }
        self
    }

    /// Unwrap into the plain snapshot
    pub fn into_snapshot(self) -> Snapshot<T> {
        self.base.into_snapshot()
    }
}

impl<T: LivingEntity + ?Sized + 'static> Default for SavedLivingEntityState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LivingEntity + ?Sized + 'static> From<Snapshot<T>> for SavedLivingEntityState<T> {
    fn from(snapshot: Snapshot<T>) -> Self {
        Self {
            base: SavedEntityState::from(snapshot),
        }
    }
}

impl<T: ?Sized> Deref for SavedLivingEntityState<T> {
    type Target = SavedEntityState<T>;

    fn deref(&self) -> &SavedEntityState<T> {
        &self.base
    }
}

impl<T: ?Sized> DerefMut for SavedLivingEntityState<T> {
    fn deref_mut(&mut self) -> &mut SavedEntityState<T> {
        &mut self.base
    }
}

impl<T: ?Sized> fmt::Debug for SavedLivingEntityState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedLivingEntityState")
            .field("base", &self.base)
            .finish()
    }
}

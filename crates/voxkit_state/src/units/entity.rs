//! State units shared by every entity

use glam::DVec3;
use serde::{Deserialize, Serialize};
use voxkit_core::{Result, StateType};

use crate::target::{Entity, EntityFlags, Location};
use crate::unit::{fields_of, Fields, StateUnit};

/// Where the entity stands and which way it faces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub location: Option<Location>,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for LocationState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.location = Some(target.location());
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        match &self.location {
            Some(location) => target.teleport(location),
            None => Ok(()),
        }
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Movement velocity
///
/// Restored after the location, since teleporting clears velocity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityState {
    pub velocity: DVec3,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for VelocityState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.velocity = target.velocity();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_velocity(self.velocity);
        Ok(())
    }

    fn restore_after(&self) -> Vec<StateType> {
        vec![StateType::of::<LocationState>()]
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Distance fallen so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallDistanceState {
    pub fall_distance: f32,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for FallDistanceState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.fall_distance = target.fall_distance();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_fall_distance(self.fall_distance);
        Ok(())
    }

    fn restore_after(&self) -> Vec<StateType> {
        vec![StateType::of::<LocationState>()]
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Remaining burn time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireTicksState {
    pub fire_ticks: i32,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for FireTicksState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.fire_ticks = target.fire_ticks();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_fire_ticks(self.fire_ticks);
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Custom name tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomNameState {
    pub custom_name: Option<String>,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for CustomNameState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.custom_name = target.custom_name();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_custom_name(self.custom_name.clone());
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Gravity, glowing, silent and invulnerable flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagsState {
    pub flags: EntityFlags,
}

impl<E: Entity + ?Sized + 'static> StateUnit<E> for FlagsState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.flags = target.flags();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_flags(self.flags);
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MemoryEntity;

    #[test]
    fn test_uncaptured_location_is_noop() {
        let mut entity = MemoryEntity::default();
        let before = entity.clone();

        StateUnit::<MemoryEntity>::restore_state(&LocationState::default(), &mut entity).unwrap();
        assert_eq!(entity, before);
    }

    #[test]
    fn test_velocity_follows_location() {
        let unit = VelocityState::default();
        let deps = StateUnit::<MemoryEntity>::restore_after(&unit);
        assert_eq!(deps, vec![StateType::of::<LocationState>()]);
    }

    #[test]
    fn test_flags_capture() {
        let mut entity = MemoryEntity::default();
        entity.flags.glowing = true;

        let mut unit = FlagsState::default();
        unit.capture_state(&entity).unwrap();
        entity.flags.glowing = false;

        assert!(unit.flags.glowing);
    }
}

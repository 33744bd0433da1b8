//! State units for living entities

use serde::{Deserialize, Serialize};
use voxkit_core::{Result, StateType};

use crate::target::{Equipment, LivingEntity, PotionEffect};
use crate::unit::{fields_of, Fields, StateUnit};

/// Maximum health
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxHealthState {
    pub max_health: f64,
}

impl<E: LivingEntity + ?Sized + 'static> StateUnit<E> for MaxHealthState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.max_health = target.max_health();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_max_health(self.max_health)
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Current health
///
/// Restored after the maximum, which bounds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthState {
    pub health: f64,
}

impl<E: LivingEntity + ?Sized + 'static> StateUnit<E> for HealthState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.health = target.health();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_health(self.health)
    }

    fn restore_after(&self) -> Vec<StateType> {
        vec![StateType::of::<MaxHealthState>()]
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Remaining air supply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainingAirState {
    pub remaining_air: i32,
}

impl<E: LivingEntity + ?Sized + 'static> StateUnit<E> for RemainingAirState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.remaining_air = target.remaining_air();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_remaining_air(self.remaining_air);
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Active potion effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PotionEffectsState {
    pub effects: Vec<PotionEffect>,
}

impl<E: LivingEntity + ?Sized + 'static> StateUnit<E> for PotionEffectsState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.effects = target.potion_effects();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_potion_effects(self.effects.clone());
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

/// Equipped items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentState {
    pub equipment: Equipment,
}

impl<E: LivingEntity + ?Sized + 'static> StateUnit<E> for EquipmentState {
    fn capture_state(&mut self, target: &E) -> Result<()> {
        self.equipment = target.equipment();
        Ok(())
    }

    fn restore_state(&self, target: &mut E) -> Result<()> {
        target.set_equipment(self.equipment.clone());
        Ok(())
    }

    fn to_fields(&self) -> Result<Option<Fields>> {
        fields_of(self).map(Some)
    }
}

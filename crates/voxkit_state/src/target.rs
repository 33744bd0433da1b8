//! Host target model
//!
//! The built-in state units read and write entities through these traits.
//! A server adapter implements them over its own entity handles;
//! [`MemoryEntity`] is a plain in-memory implementation for offline
//! tooling and tests.

use std::collections::BTreeMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use voxkit_core::{Error, Result};

/// A position in a named world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// World name
    pub world: String,
    /// Position in block coordinates
    pub position: DVec3,
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees
    pub pitch: f32,
}

impl Location {
    /// Create a location facing yaw/pitch zero
    pub fn new(world: impl Into<String>, position: DVec3) -> Self {
        Self {
            world: world.into(),
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Set facing direction
    pub fn with_rotation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }
}

/// Boolean entity flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFlags {
    pub gravity: bool,
    pub glowing: bool,
    pub silent: bool,
    pub invulnerable: bool,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self {
            gravity: true,
            glowing: false,
            silent: false,
            invulnerable: false,
        }
    }
}

/// An active potion effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionEffect {
    /// Effect identifier, e.g. `minecraft:speed`
    pub kind: String,
    /// Zero-based amplifier
    pub amplifier: u8,
    /// Remaining duration in ticks
    pub duration_ticks: u32,
    /// Whether the effect comes from a beacon or similar source
    pub ambient: bool,
}

impl PotionEffect {
    /// Create a non-ambient effect
    pub fn new(kind: impl Into<String>, amplifier: u8, duration_ticks: u32) -> Self {
        Self {
            kind: kind.into(),
            amplifier,
            duration_ticks,
            ambient: false,
        }
    }
}

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Feet,
}

/// A stack of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Material identifier
    pub material: String,
    /// Stack size
    pub amount: u8,
    /// Display name override
    pub display_name: Option<String>,
}

impl ItemStack {
    /// Create a plain stack
    pub fn new(material: impl Into<String>, amount: u8) -> Self {
        Self {
            material: material.into(),
            amount,
            display_name: None,
        }
    }
}

/// Items held in equipment slots
pub type Equipment = BTreeMap<EquipmentSlot, ItemStack>;

/// Any entity in a world
pub trait Entity {
    /// Current location
    fn location(&self) -> Location;

    /// Move to a location
    ///
    /// Teleporting clears the entity's velocity.
    fn teleport(&mut self, location: &Location) -> Result<()>;

    /// Current velocity in blocks per tick
    fn velocity(&self) -> DVec3;

    /// Set velocity
    fn set_velocity(&mut self, velocity: DVec3);

    /// Distance fallen since last touching ground
    fn fall_distance(&self) -> f32;

    /// Set fall distance
    fn set_fall_distance(&mut self, distance: f32);

    /// Remaining ticks of burning
    fn fire_ticks(&self) -> i32;

    /// Set burning ticks
    fn set_fire_ticks(&mut self, ticks: i32);

    /// Custom name tag
    fn custom_name(&self) -> Option<String>;

    /// Set or clear the custom name tag
    fn set_custom_name(&mut self, name: Option<String>);

    /// Boolean flags
    fn flags(&self) -> EntityFlags;

    /// Set boolean flags
    fn set_flags(&mut self, flags: EntityFlags);
}

/// An entity with health, air and equipment
pub trait LivingEntity: Entity {
    /// Current health
    fn health(&self) -> f64;

    /// Set health, failing if it is above the maximum
    fn set_health(&mut self, health: f64) -> Result<()>;

    /// Maximum health
    fn max_health(&self) -> f64;

    /// Set maximum health, clamping current health down to it
    fn set_max_health(&mut self, max_health: f64) -> Result<()>;

    /// Remaining air ticks
    fn remaining_air(&self) -> i32;

    /// Set remaining air ticks
    fn set_remaining_air(&mut self, ticks: i32);

    /// Active potion effects
    fn potion_effects(&self) -> Vec<PotionEffect>;

    /// Replace all active potion effects
    fn set_potion_effects(&mut self, effects: Vec<PotionEffect>);

    /// Equipped items
    fn equipment(&self) -> Equipment;

    /// Replace all equipped items
    fn set_equipment(&mut self, equipment: Equipment);
}

/// In-memory living entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntity {
    pub location: Location,
    pub velocity: DVec3,
    pub fall_distance: f32,
    pub fire_ticks: i32,
    pub custom_name: Option<String>,
    pub flags: EntityFlags,
    pub health: f64,
    pub max_health: f64,
    pub remaining_air: i32,
    pub potion_effects: Vec<PotionEffect>,
    pub equipment: Equipment,
    /// Worlds teleports may target; empty means any
    pub loaded_worlds: Vec<String>,
}

impl MemoryEntity {
    /// Default air supply in ticks
    pub const MAX_AIR: i32 = 300;

    /// Create an entity standing at a location
    pub fn new(location: Location) -> Self {
        Self {
            location,
            velocity: DVec3::ZERO,
            fall_distance: 0.0,
            fire_ticks: 0,
            custom_name: None,
            flags: EntityFlags::default(),
            health: 20.0,
            max_health: 20.0,
            remaining_air: Self::MAX_AIR,
            potion_effects: Vec::new(),
            equipment: Equipment::new(),
            loaded_worlds: Vec::new(),
        }
    }

    /// Restrict teleports to these worlds
    pub fn with_loaded_worlds<I, S>(mut self, worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loaded_worlds = worlds.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for MemoryEntity {
    fn default() -> Self {
        Self::new(Location::new("world", DVec3::ZERO))
    }
}

impl Entity for MemoryEntity {
    fn location(&self) -> Location {
        self.location.clone()
    }

    fn teleport(&mut self, location: &Location) -> Result<()> {
        if !self.loaded_worlds.is_empty() && !self.loaded_worlds.contains(&location.world) {
            return Err(Error::target(format!("world '{}' is not loaded", location.world)));
        }
        self.location = location.clone();
        self.velocity = DVec3::ZERO;
        Ok(())
    }

    fn velocity(&self) -> DVec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: DVec3) {
        self.velocity = velocity;
    }

    fn fall_distance(&self) -> f32 {
        self.fall_distance
    }

    fn set_fall_distance(&mut self, distance: f32) {
        self.fall_distance = distance;
    }

    fn fire_ticks(&self) -> i32 {
        self.fire_ticks
    }

    fn set_fire_ticks(&mut self, ticks: i32) {
        self.fire_ticks = ticks;
    }

    fn custom_name(&self) -> Option<String> {
        self.custom_name.clone()
    }

    fn set_custom_name(&mut self, name: Option<String>) {
        self.custom_name = name;
    }

    fn flags(&self) -> EntityFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: EntityFlags) {
        self.flags = flags;
    }
}

impl LivingEntity for MemoryEntity {
    fn health(&self) -> f64 {
        self.health
    }

    fn set_health(&mut self, health: f64) -> Result<()> {
        if !(0.0..=self.max_health).contains(&health) {
            return Err(Error::target(format!(
                "health {} outside 0..={}",
                health, self.max_health
            )));
        }
        self.health = health;
        Ok(())
    }

    fn max_health(&self) -> f64 {
        self.max_health
    }

    fn set_max_health(&mut self, max_health: f64) -> Result<()> {
        if max_health <= 0.0 {
            return Err(Error::target(format!("max health {} must be positive", max_health)));
        }
        self.max_health = max_health;
        self.health = self.health.min(max_health);
        Ok(())
    }

    fn remaining_air(&self) -> i32 {
        self.remaining_air
    }

    fn set_remaining_air(&mut self, ticks: i32) {
        self.remaining_air = ticks;
    }

    fn potion_effects(&self) -> Vec<PotionEffect> {
        self.potion_effects.clone()
    }

    fn set_potion_effects(&mut self, effects: Vec<PotionEffect>) {
        self.potion_effects = effects;
    }

    fn equipment(&self) -> Equipment {
        self.equipment.clone()
    }

    fn set_equipment(&mut self, equipment: Equipment) {
        self.equipment = equipment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teleport_clears_velocity() {
        let mut entity = MemoryEntity::default();
        entity.set_velocity(DVec3::new(0.0, 1.5, 0.0));

        entity.teleport(&Location::new("world", DVec3::new(10.0, 64.0, -3.0))).unwrap();
        assert_eq!(entity.velocity(), DVec3::ZERO);
        assert_eq!(entity.location().position, DVec3::new(10.0, 64.0, -3.0));
    }

    #[test]
    fn test_teleport_to_unloaded_world() {
        let mut entity = MemoryEntity::default().with_loaded_worlds(["world"]);
        let result = entity.teleport(&Location::new("world_nether", DVec3::ZERO));

        assert!(matches!(result, Err(Error::Target(_))));
        assert_eq!(entity.location().world, "world");
    }

    #[test]
    fn test_health_bounded_by_max() {
        let mut entity = MemoryEntity::default();

        assert!(entity.set_health(30.0).is_err());
        entity.set_max_health(40.0).unwrap();
        entity.set_health(30.0).unwrap();

        entity.set_max_health(10.0).unwrap();
        assert_eq!(entity.health(), 10.0);
    }
}

//! Built-in state units for entities
//!
//! Entity units work on any [`Entity`](crate::target::Entity), living
//! units on any [`LivingEntity`](crate::target::LivingEntity). All of them
//! persist through serde field maps.

pub mod entity;
pub mod living;

pub use entity::*;
pub use living::*;

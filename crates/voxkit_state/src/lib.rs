//! # voxkit_state - Entity State Snapshots
//!
//! Captures slices of entity state and restores them later, onto the same
//! or another entity, in an order derived from "restore after"
//! declarations.
//!
//! # Features
//!
//! - Capability-style [`StateUnit`] trait, one unit per concrete type
//! - Dependency graph with cycle detection
//! - Chainable [`Snapshot`] facade with layered entity defaults
//! - Owned [`StateRegistry`] for rebuilding units from persisted fields
//!
//! # Example
//!
//! ```ignore
//! use voxkit_state::prelude::*;
//!
//! let mut saved = SavedLivingEntityState::new();
//! saved.track_all().capture_state(&entity)?;
//!
//! // Later, possibly onto a freshly spawned entity
//! saved.restore_state(&mut respawned)?;
//!
//! // Persist and load back
//! let record = saved.to_record()?;
//! let registry = StateRegistry::with_living_defaults();
//! let loaded = Snapshot::from_record(&record, &registry)?;
//! ```
//!
//! Edges are resolved when a unit is tracked, against the units already
//! present. Track dependencies first, or call `rebuild_edges`.
//!
//! Nothing here is synchronized: a snapshot is driven from one thread,
//! and registries are filled before they are shared.

pub mod defaults;
pub mod graph;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod target;
pub mod unit;
pub mod units;

pub mod prelude {
    pub use crate::defaults::{DefaultsConfig, SavedEntityState, SavedLivingEntityState};
    pub use crate::graph::DependencyGraph;
    pub use crate::record::{SnapshotRecord, UnitRecord};
    pub use crate::registry::{StateRegistry, UnitFactory};
    pub use crate::snapshot::Snapshot;
    pub use crate::target::{Entity, LivingEntity, Location, MemoryEntity};
    pub use crate::unit::{fields_of, from_fields, Fields, StateUnit};
    pub use voxkit_core::{Error, Result, StateType};
}

pub use prelude::*;

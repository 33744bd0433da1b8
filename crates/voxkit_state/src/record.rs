//! Persisted shape of a snapshot
//!
//! A record lists each persistable unit by its type key together with its
//! field map. Units are written in restore order: every prerequisite comes
//! before its dependents, so re-tracking them in record order on load
//! freezes the same restore-after edges and yields the same restore order,
//! however the original edges were made.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use voxkit_core::Result;

use crate::registry::StateRegistry;
use crate::snapshot::Snapshot;
use crate::unit::Fields;

/// One persisted unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Type key of the unit
    pub key: String,
    /// Captured data
    pub fields: Fields,
}

/// A persisted snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Units in restore order
    pub units: Vec<UnitRecord>,
}

impl SnapshotRecord {
    /// Find a unit record by key
    pub fn get(&self, key: &str) -> Option<&UnitRecord> {
        self.units.iter().find(|unit| unit.key == key)
    }
}

impl<T: ?Sized + 'static> Snapshot<T> {
    /// Persist every unit that supports it
    ///
    /// Fails with the cycle error if the snapshot has no restore order.
    pub fn to_record(&self) -> Result<SnapshotRecord> {
        let mut units = Vec::with_capacity(self.len());

        for unit in self.graph().restore_order()? {
            let ty = unit.state_type();
            match unit.to_fields()? {
                Some(fields) => units.push(UnitRecord { key: ty.key(), fields }),
                None => debug!("State {} is not persistable, skipping", ty),
            }
        }

        Ok(SnapshotRecord { units })
    }

    /// Rebuild a snapshot from a record
    ///
    /// Unknown keys are skipped. Factory errors abort the load.
    pub fn from_record(record: &SnapshotRecord, registry: &StateRegistry<T>) -> Result<Self> {
        let mut snapshot = Self::new();

        for unit in &record.units {
            match registry.deserialize(&unit.key, &unit.fields) {
                Some(result) => {
                    snapshot.track_boxed(result?);
                }
                None => warn!("Unknown state key '{}' in snapshot record, skipping", unit.key),
            }
        }

        Ok(snapshot)
    }
}

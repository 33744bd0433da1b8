//! Snapshots - chainable facade over a dependency graph

use core::fmt;

use voxkit_core::{Result, StateType};

use crate::graph::DependencyGraph;
use crate::unit::StateUnit;

/// A set of state units captured and restored together
///
/// A snapshot can be captured any number of times; each capture
/// overwrites the data of every tracked unit. The target passed to
/// `restore_state` need not be the one that was captured.
pub struct Snapshot<T: ?Sized> {
    graph: DependencyGraph<T>,
}

impl<T: ?Sized + 'static> Snapshot<T> {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
        }
    }

    /// Track a unit, replacing any unit of the same type
    pub fn track<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.graph.add_tracker(unit);
        self
    }

    /// Track a boxed unit, replacing any unit of the same type
    pub fn track_boxed(&mut self, unit: Box<dyn StateUnit<T>>) -> &mut Self {
        self.graph.add_boxed(unit);
        self
    }

    /// Track every unit of a collection, in iteration order
    pub fn track_all_of<I>(&mut self, units: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn StateUnit<T>>>,
    {
        for unit in units {
            self.graph.add_boxed(unit);
        }
        self
    }

    /// Track a unit unless one of the same type is already tracked
    pub fn track_if_absent<U: StateUnit<T>>(&mut self, unit: U) -> &mut Self {
        self.graph.add_if_absent(unit);
        self
    }

    /// Recompute all edges against the currently tracked units
    pub fn rebuild_edges(&mut self) -> &mut Self {
        self.graph.rebuild_edges();
        self
    }

    /// Capture every tracked unit from the target
    pub fn capture_state(&mut self, target: &T) -> Result<&mut Self> {
        self.graph.capture_state(target)?;
        Ok(self)
    }

    /// Restore every tracked unit onto the target
    pub fn restore_state(&self, target: &mut T) -> Result<&Self> {
        self.graph.restore_state(target)?;
        Ok(self)
    }

    /// Unit types in restore order
    pub fn restore_order(&self) -> Result<Vec<StateType>> {
        self.graph.restore_order_types()
    }

    /// Get the tracked unit of this type
    pub fn get<U: StateUnit<T>>(&self) -> Option<&U> {
        self.graph.get()
    }

    /// Check if a unit of this type is tracked
    pub fn is_tracking<U: StateUnit<T>>(&self) -> bool {
        self.graph.contains::<U>()
    }

    /// Stop tracking a unit type
    pub fn untrack<U: StateUnit<T>>(&mut self) -> &mut Self {
        self.graph.remove::<U>();
        self
    }

    /// The underlying graph
    pub fn graph(&self) -> &DependencyGraph<T> {
        &self.graph
    }

    /// Number of tracked units
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Check if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

impl<T: ?Sized + 'static> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("graph", &self.graph).finish()
    }
}

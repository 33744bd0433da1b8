//! Dependency graph over tracked state units
//!
//! Each tracked unit becomes a node keyed by its concrete type. When a
//! node is inserted, its "restore after" declarations are resolved
//! against the nodes present at that moment and frozen as edges.
//!
//! Edges are insertion-order-sensitive: a unit added later never becomes
//! a prerequisite of a unit added earlier, unless the earlier unit is
//! re-added or [`DependencyGraph::rebuild_edges`] is called.

use core::any::TypeId;
use core::fmt;
use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use voxkit_core::{Error, Result, StateType};

use crate::unit::StateUnit;

/// A tracked unit and the nodes it restores after
struct Node<T: ?Sized> {
    /// Concrete type of the unit
    ty: StateType,
    /// The unit itself
    unit: Box<dyn StateUnit<T>>,
    /// Concrete types of the nodes this one must follow
    after: Vec<StateType>,
}

/// Scratch state for one order resolution
#[derive(Default)]
struct Resolution {
    /// Nodes in resolved order
    order: Vec<TypeId>,
    /// Same as `order`, for lookups
    resolved: HashSet<TypeId>,
    /// Nodes on the active traversal path
    path: HashSet<TypeId>,
}

/// Ordered set of state units with restore-after edges
pub struct DependencyGraph<T: ?Sized> {
    /// Nodes by concrete unit type
    nodes: HashMap<TypeId, Node<T>>,
    /// Insertion order of `nodes`
    insertion: Vec<TypeId>,
}

impl<T: ?Sized + 'static> DependencyGraph<T> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            insertion: Vec::new(),
        }
    }

    /// Track a unit, replacing any unit of the same concrete type
    pub fn add_tracker<U: StateUnit<T>>(&mut self, unit: U) {
        self.add_boxed(Box::new(unit));
    }

    /// Track a boxed unit, replacing any unit of the same concrete type
    pub fn add_boxed(&mut self, unit: Box<dyn StateUnit<T>>) {
        let ty = unit.state_type();

        if self.nodes.remove(&ty.type_id).is_some() {
            self.insertion.retain(|id| *id != ty.type_id);
            debug!("Replacing tracked state {}", ty);
        }

        let after = self.edges_for(ty, unit.as_ref());
        self.insertion.push(ty.type_id);
        self.nodes.insert(ty.type_id, Node { ty, unit, after });
    }

    /// Track a unit unless one of the same concrete type is present
    ///
    /// Returns whether the unit was inserted.
    pub fn add_if_absent<U: StateUnit<T>>(&mut self, unit: U) -> bool {
        if self.contains::<U>() {
            return false;
        }
        self.add_tracker(unit);
        true
    }

    /// Boxed variant of [`add_if_absent`](Self::add_if_absent)
    pub fn add_boxed_if_absent(&mut self, unit: Box<dyn StateUnit<T>>) -> bool {
        if self.nodes.contains_key(&unit.state_type().type_id) {
            return false;
        }
        self.add_boxed(unit);
        true
    }

    /// Stop tracking a unit type
    ///
    /// Edges other nodes hold towards the removed type are ignored until a
    /// unit of that type is tracked again.
    pub fn remove<U: StateUnit<T>>(&mut self) -> Option<Box<dyn StateUnit<T>>> {
        let id = TypeId::of::<U>();
        let node = self.nodes.remove(&id)?;
        self.insertion.retain(|i| *i != id);
        Some(node.unit)
    }

    /// Recompute every node's edges against the full current node set
    pub fn rebuild_edges(&mut self) {
        let rebuilt: Vec<(TypeId, Vec<StateType>)> = self
            .insertion
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| (node.ty.type_id, self.edges_for(node.ty, node.unit.as_ref())))
            .collect();

        for (id, after) in rebuilt {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.after = after;
            }
        }
    }

    /// Nodes matching any of the unit's declared dependency types
    fn edges_for(&self, ty: StateType, unit: &dyn StateUnit<T>) -> Vec<StateType> {
        let wanted = unit.restore_after();
        if wanted.is_empty() {
            return Vec::new();
        }

        self.insertion
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|node| node.ty != ty)
            .filter(|node| wanted.iter().any(|dep| node.unit.is_instance_of(dep)))
            .map(|node| node.ty)
            .collect()
    }

    /// Units in restore order: every unit follows the units it depends on
    pub fn restore_order(&self) -> Result<Vec<&dyn StateUnit<T>>> {
        let order = self.resolve_order()?;
        Ok(order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.unit.as_ref())
            .collect())
    }

    /// Unit types in restore order
    pub fn restore_order_types(&self) -> Result<Vec<StateType>> {
        let order = self.resolve_order()?;
        Ok(order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.ty)
            .collect())
    }

    fn resolve_order(&self) -> Result<Vec<TypeId>> {
        let mut state = Resolution::default();

        for id in &self.insertion {
            if !state.resolved.contains(id) {
                self.resolve(*id, &mut state)?;
            }
        }

        trace!(
            "Resolved restore order: {:?}",
            state
                .order
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .map(|node| node.ty.short_name())
                .collect::<Vec<_>>()
        );
        Ok(state.order)
    }

    fn resolve(&self, id: TypeId, state: &mut Resolution) -> Result<()> {
        let Some(node) = self.nodes.get(&id) else {
            return Ok(());
        };

        state.path.insert(id);
        for dep in &node.after {
            if state.resolved.contains(&dep.type_id) || !self.nodes.contains_key(&dep.type_id) {
                continue;
            }
            if state.path.contains(&dep.type_id) {
                warn!("Cyclic restore dependency between {} and {}", node.ty, dep);
                return Err(Error::cyclic(node.ty.short_name(), dep.short_name()));
            }
            self.resolve(dep.type_id, state)?;
        }
        state.path.remove(&id);

        state.resolved.insert(id);
        state.order.push(id);
        Ok(())
    }

    /// Restore every unit onto the target, dependencies first
    ///
    /// The whole order is resolved before any unit runs, so a cycle
    /// leaves the target untouched. Unit errors are returned as-is.
    pub fn restore_state(&self, target: &mut T) -> Result<()> {
        for unit in self.restore_order()? {
            unit.restore_state(target)?;
        }
        Ok(())
    }

    /// Capture every unit from the target, in reverse restore order
    pub fn capture_state(&mut self, target: &T) -> Result<()> {
        let order = self.resolve_order()?;
        for id in order.iter().rev() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.unit.capture_state(target)?;
            }
        }
        Ok(())
    }

    /// Check if a unit of this type is tracked
    pub fn contains<U: StateUnit<T>>(&self) -> bool {
        self.nodes.contains_key(&TypeId::of::<U>())
    }

    /// Get the tracked unit of this type
    pub fn get<U: StateUnit<T>>(&self) -> Option<&U> {
        self.nodes.get(&TypeId::of::<U>())?.unit.downcast_ref()
    }

    /// Declared edges of a tracked unit type, as frozen at insertion
    pub fn dependencies_of<U: StateUnit<T>>(&self) -> Option<&[StateType]> {
        self.nodes.get(&TypeId::of::<U>()).map(|node| node.after.as_slice())
    }

    /// Iterate over tracked units in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &dyn StateUnit<T>> {
        self.insertion
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.unit.as_ref())
    }

    /// Get the number of tracked units
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T: ?Sized + 'static> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for DependencyGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field(
                "nodes",
                &self
                    .insertion
                    .iter()
                    .filter_map(|id| self.nodes.get(id))
                    .map(|node| node.ty.short_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Target that records which units were restored onto it
    #[derive(Default)]
    struct Journal {
        restored: Vec<&'static str>,
    }

    struct Family;

    macro_rules! test_unit {
        ($name:ident, [$($dep:ty),*]) => {
            test_unit!($name, [$($dep),*], []);
        };
        ($name:ident, [$($dep:ty),*], [$($family:ty),*]) => {
            #[derive(Default)]
            struct $name {
                tag: u32,
                log: Rc<RefCell<Vec<(&'static str, u32)>>>,
            }

            impl StateUnit<Journal> for $name {
                fn capture_state(&mut self, _target: &Journal) -> Result<()> {
                    self.log.borrow_mut().push((concat!("capture ", stringify!($name)), self.tag));
                    Ok(())
                }

                fn restore_state(&self, target: &mut Journal) -> Result<()> {
                    target.restored.push(stringify!($name));
                    self.log.borrow_mut().push((concat!("restore ", stringify!($name)), self.tag));
                    Ok(())
                }

                fn restore_after(&self) -> Vec<StateType> {
                    vec![$(StateType::of::<$dep>()),*]
                }

                fn families(&self) -> Vec<StateType> {
                    vec![$(StateType::of::<$family>()),*]
                }
            }
        };
    }

    test_unit!(A, [B]);
    test_unit!(B, [C]);
    test_unit!(C, []);
    test_unit!(D, []);
    test_unit!(Member, [], [Family]);
    test_unit!(NeedsFamily, [Family]);
    test_unit!(X, [Y]);
    test_unit!(Y, [X]);

    fn names(graph: &DependencyGraph<Journal>) -> Vec<&'static str> {
        graph
            .restore_order_types()
            .unwrap()
            .iter()
            .map(|ty| ty.short_name())
            .collect()
    }

    #[test]
    fn test_chain_restore_order() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(C::default());
        graph.add_tracker(B::default());
        graph.add_tracker(A::default());

        assert_eq!(names(&graph), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_capture_is_reverse_of_restore() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = DependencyGraph::new();
        graph.add_tracker(C { tag: 0, log: log.clone() });
        graph.add_tracker(B { tag: 0, log: log.clone() });
        graph.add_tracker(A { tag: 0, log: log.clone() });

        let journal = Journal::default();
        graph.capture_state(&journal).unwrap();

        let captured: Vec<_> = log.borrow().iter().map(|(name, _)| *name).collect();
        assert_eq!(captured, vec!["capture A", "capture B", "capture C"]);
    }

    #[test]
    fn test_edges_frozen_at_insertion() {
        let mut graph = DependencyGraph::new();
        // A declares B, but B is not present yet
        graph.add_tracker(A::default());
        graph.add_tracker(B::default());

        assert_eq!(graph.dependencies_of::<A>(), Some(&[][..]));
        assert_eq!(names(&graph), vec!["A", "B"]);
    }

    #[test]
    fn test_rebuild_edges_links_later_units() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(A::default());
        graph.add_tracker(B::default());
        graph.rebuild_edges();

        assert_eq!(names(&graph), vec!["B", "A"]);
    }

    #[test]
    fn test_retrack_replaces_and_recomputes_edges() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = DependencyGraph::new();
        graph.add_tracker(A { tag: 1, log: log.clone() });
        graph.add_tracker(B { tag: 0, log: log.clone() });
        graph.add_tracker(A { tag: 2, log: log.clone() });

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get::<A>().map(|a| a.tag), Some(2));
        assert_eq!(names(&graph), vec!["B", "A"]);

        let mut journal = Journal::default();
        graph.restore_state(&mut journal).unwrap();
        assert!(log.borrow().contains(&("restore A", 2)));
        assert!(!log.borrow().contains(&("restore A", 1)));
    }

    #[test]
    fn test_add_if_absent_keeps_first() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(A { tag: 1, ..Default::default() });

        assert!(!graph.add_if_absent(A { tag: 2, ..Default::default() }));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get::<A>().map(|a| a.tag), Some(1));

        assert!(graph.add_if_absent(D::default()));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_cycle_is_detected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = DependencyGraph::new();
        graph.add_tracker(X { tag: 0, log: log.clone() });
        graph.add_tracker(Y { tag: 0, log: log.clone() });
        // Re-adding X resolves its edge to Y, closing the loop
        graph.add_tracker(X { tag: 0, log: log.clone() });

        let err = graph.restore_order().err().unwrap();
        let msg = err.to_string();
        assert!(err.is_cycle());
        assert!(msg.contains('X') && msg.contains('Y'));

        let mut journal = Journal::default();
        assert!(graph.restore_state(&mut journal).unwrap_err().is_cycle());
        assert!(graph.capture_state(&journal).unwrap_err().is_cycle());
        assert!(journal.restored.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_restore_runs_in_order() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(C::default());
        graph.add_tracker(D::default());
        graph.add_tracker(B::default());

        let mut journal = Journal::default();
        graph.restore_state(&mut journal).unwrap();
        assert_eq!(journal.restored, vec!["C", "D", "B"]);
    }

    #[test]
    fn test_replaced_node_edge_follows_type() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = DependencyGraph::new();
        graph.add_tracker(B { tag: 1, log: log.clone() });
        graph.add_tracker(A { tag: 0, log: log.clone() });
        graph.add_tracker(B { tag: 2, log: log.clone() });

        // A's edge points at the B type, now held by the replacement
        assert_eq!(names(&graph), vec!["B", "A"]);
    }

    #[test]
    fn test_removed_dependency_is_skipped() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(B::default());
        graph.add_tracker(A::default());

        assert!(graph.remove::<B>().is_some());
        assert_eq!(names(&graph), vec!["A"]);
        assert!(graph.remove::<B>().is_none());
    }

    #[test]
    fn test_family_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(D::default());
        graph.add_tracker(Member::default());
        graph.add_tracker(NeedsFamily::default());

        assert_eq!(
            graph.dependencies_of::<NeedsFamily>().map(|deps| deps.len()),
            Some(1)
        );
        let order = names(&graph);
        let member = order.iter().position(|n| *n == "Member").unwrap();
        let needs = order.iter().position(|n| *n == "NeedsFamily").unwrap();
        assert!(member < needs);
    }

    #[test]
    fn test_disconnected_components_are_stable() {
        let mut graph = DependencyGraph::new();
        graph.add_tracker(D::default());
        graph.add_tracker(C::default());
        graph.add_tracker(Member::default());
        graph.add_tracker(B::default());
        graph.add_tracker(NeedsFamily::default());

        let first = names(&graph);
        assert_eq!(first.len(), 5);
        assert_eq!(first, names(&graph));
    }

    #[test]
    fn test_empty_graph() {
        let mut graph: DependencyGraph<Journal> = DependencyGraph::default();
        let mut journal = Journal::default();

        assert!(graph.is_empty());
        assert!(graph.restore_order().unwrap().is_empty());
        graph.capture_state(&journal).unwrap();
        graph.restore_state(&mut journal).unwrap();
    }
}

use std::collections::{BTreeMap, BTreeSet};

use super::wire::WireId;

/// Undirected join edges between wires.
///
/// Both directions are always stored, so `a` is connected to `b` exactly
/// when `b` is connected to `a`.
#[derive(Debug, Clone, Default)]
pub struct JoinEdges {
    adjacency: BTreeMap<WireId, BTreeSet<WireId>>,
}

impl JoinEdges {
    /// Adds the edge `a — b`. Returns `false` if it already existed or `a == b`.
    pub fn connect(&mut self, a: WireId, b: WireId) -> bool {
        if a == b || self.are_connected(a, b) {
            return false;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        true
    }

    /// Removes the edge `a — b`. Returns `false` if there was none.
    pub fn disconnect(&mut self, a: WireId, b: WireId) -> bool {
        let removed = self.unlink(a, b);
        self.unlink(b, a);
        removed
    }

    /// Returns `true` if `a` and `b` are joined.
    #[must_use]
    pub fn are_connected(&self, a: WireId, b: WireId) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Returns the wires joined to `wire`, in key order.
    #[must_use]
    pub fn neighbors(&self, wire: WireId) -> Vec<WireId> {
        self.adjacency
            .get(&wire)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Removes every edge touching `wire`, returning its former neighbors.
    pub fn remove_wire(&mut self, wire: WireId) -> Vec<WireId> {
        let neighbors: Vec<WireId> = self
            .adjacency
            .remove(&wire)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for &other in &neighbors {
            self.unlink(other, wire);
        }
        neighbors
    }

    /// Returns every edge once, as `(smaller, larger)` key pairs.
    #[must_use]
    pub fn edges(&self) -> Vec<(WireId, WireId)> {
        self.adjacency
            .iter()
            .flat_map(|(&a, set)| set.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect()
    }

    /// Removes all edges.
    pub fn clear(&mut self) {
        self.adjacency.clear();
    }

    fn unlink(&mut self, from: WireId, to: WireId) -> bool {
        let Some(set) = self.adjacency.get_mut(&from) else {
            return false;
        };
        let removed = set.remove(&to);
        if set.is_empty() {
            self.adjacency.remove(&from);
        }
        removed
    }
}

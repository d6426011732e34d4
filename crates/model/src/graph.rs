//! Undirected interaction graph over element identities.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use assembly_element::{ElementId, Interface};
use serde::{Deserialize, Serialize};

/// Payload of one edge: the primary interface plus any further contacts
/// found between the same two elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<Interface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
}

impl Interaction {
    /// The largest interface becomes the primary one; `interfaces` must be
    /// sorted largest first.
    pub fn from_interfaces(mut interfaces: Vec<Interface>) -> Self {
        if interfaces.is_empty() {
            return Self::default();
        }
        let first = interfaces.remove(0);
        Self {
            interface: Some(first),
            interfaces,
        }
    }

    /// Primary interface first, then the rest.
    pub fn all(&self) -> impl Iterator<Item = &Interface> {
        self.interface.iter().chain(self.interfaces.iter())
    }
}

/// Endpoints ordered smaller identity first.
pub fn edge_key(a: ElementId, b: ElementId) -> (ElementId, ElementId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A simple undirected graph: no self-edges, at most one edge per pair.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    adjacency: HashMap<ElementId, BTreeSet<ElementId>>,
    edges: BTreeMap<(ElementId, ElementId), Interaction>,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn add_vertex(&mut self, id: ElementId) {
        self.adjacency.entry(id).or_default();
    }

    /// Remove `id` and every edge touching it.
    pub fn remove_vertex(&mut self, id: ElementId) {
        let Some(neighbours) = self.adjacency.remove(&id) else {
            return;
        };
        for n in neighbours {
            if let Some(set) = self.adjacency.get_mut(&n) {
                set.remove(&id);
            }
            self.edges.remove(&edge_key(id, n));
        }
    }

    pub fn has_vertex(&self, id: ElementId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn vertices(&self) -> BTreeSet<ElementId> {
        self.adjacency.keys().copied().collect()
    }

    /// Insert or update the edge `{a, b}`. Both vertices must exist and
    /// differ; returns `false` otherwise. A supplied payload replaces the
    /// stored one; `None` keeps it.
    pub fn add_edge(&mut self, a: ElementId, b: ElementId, payload: Option<Interaction>) -> bool {
        if a == b || !self.has_vertex(a) || !self.has_vertex(b) {
            return false;
        }
        let entry = self.edges.entry(edge_key(a, b)).or_default();
        if let Some(p) = payload {
            *entry = p;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        true
    }

    pub fn remove_edge(&mut self, a: ElementId, b: ElementId) -> bool {
        if self.edges.remove(&edge_key(a, b)).is_none() {
            return false;
        }
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
        true
    }

    pub fn clear_edges(&mut self) {
        self.edges.clear();
        for set in self.adjacency.values_mut() {
            set.clear();
        }
    }

    pub fn has_edge(&self, a: ElementId, b: ElementId) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    pub fn edge(&self, a: ElementId, b: ElementId) -> Option<&Interaction> {
        self.edges.get(&edge_key(a, b))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges ordered by endpoint identities.
    pub fn edges(&self) -> impl Iterator<Item = (ElementId, ElementId, &Interaction)> {
        self.edges.iter().map(|(&(a, b), p)| (a, b, p))
    }

    /// Neighbours in ascending identity order.
    pub fn neighbors(&self, id: ElementId) -> Vec<ElementId> {
        self.adjacency
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Fewest-edges path from `src` to `dst`, both included.
    ///
    /// Among equally short paths the lexicographically smallest sequence of
    /// identities wins: the search expands neighbours in ascending order and
    /// keeps the first parent that reaches each vertex. Empty when either
    /// vertex is missing or they are disconnected.
    pub fn shortest_path(&self, src: ElementId, dst: ElementId) -> Vec<ElementId> {
        if !self.has_vertex(src) || !self.has_vertex(dst) {
            return Vec::new();
        }
        let mut parent: HashMap<ElementId, ElementId> = HashMap::new();
        let mut seen: BTreeSet<ElementId> = BTreeSet::from([src]);
        let mut queue = VecDeque::from([src]);
        while let Some(v) = queue.pop_front() {
            if v == dst {
                break;
            }
            for &n in self.adjacency.get(&v).into_iter().flatten() {
                if seen.insert(n) {
                    parent.insert(n, v);
                    queue.push_back(n);
                }
            }
        }
        if !seen.contains(&dst) {
            return Vec::new();
        }
        let mut path = vec![dst];
        let mut cur = dst;
        while let Some(&p) = parent.get(&cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        path
    }
}

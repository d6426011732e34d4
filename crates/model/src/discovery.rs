//! Interaction discovery: a broad phase proposes element pairs, the
//! face-to-face contact test accepts or rejects them, and accepted pairs
//! become graph edges.

use std::collections::BTreeSet;

use assembly_element::{ContactTolerances, Element, ElementId};
use assembly_geometry::{BoundingBox, GeometryKernel, NativeKernel};
use assembly_spatial::KdTree;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::graph::{Interaction, edge_key};
use crate::model::Model;

/// Broad-phase strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// Every pair whose inflated AABBs intersect.
    #[default]
    BruteForce,
    /// Nearest neighbours of each element center.
    KdTree,
    /// Range queries over inflated AABBs.
    AabbTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub mode: DiscoveryMode,
    /// Margin added to every AABB in the broad phase.
    pub aabb_inflation: f64,
    /// Maximum distance between touching face planes.
    pub tmax: f64,
    /// Maximum deviation (radians) from exactly opposite face normals.
    pub tol_angle: f64,
    /// Smallest contact area that makes an interaction.
    pub amin: f64,
    /// Neighbours queried per element in `KdTree` mode.
    pub max_neighbours: usize,
    /// When set, `KdTree` mode queries this radius instead of a neighbour count.
    pub radius: Option<f64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            mode: DiscoveryMode::BruteForce,
            aabb_inflation: 0.1,
            tmax: 1e-2,
            tol_angle: 1e-2,
            amin: 1e-2,
            max_neighbours: 8,
            radius: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_mode(mut self, mode: DiscoveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_aabb_inflation(mut self, inflation: f64) -> Self {
        self.aabb_inflation = inflation;
        self
    }

    pub fn with_tmax(mut self, tmax: f64) -> Self {
        self.tmax = tmax;
        self
    }

    pub fn with_tol_angle(mut self, tol_angle: f64) -> Self {
        self.tol_angle = tol_angle;
        self
    }

    pub fn with_amin(mut self, amin: f64) -> Self {
        self.amin = amin;
        self
    }

    pub fn with_max_neighbours(mut self, k: usize) -> Self {
        self.max_neighbours = k;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn contact_tolerances(&self) -> ContactTolerances {
        ContactTolerances {
            tol_dist: self.tmax,
            tol_angle: self.tol_angle,
            min_area: self.amin,
        }
    }
}

/// Outcome of one discovery run. Pairs are ordered smaller identity first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryReport {
    pub mode: DiscoveryMode,
    /// Pairs proposed by the broad phase.
    pub candidates: Vec<(ElementId, ElementId)>,
    /// Pairs that touch and became edges.
    pub accepted: Vec<(ElementId, ElementId)>,
    /// Candidates without a qualifying contact.
    pub rejected: Vec<(ElementId, ElementId)>,
    /// Elements left out of the broad phase because they have no extent.
    pub skipped: Vec<ElementId>,
}

impl Model {
    /// Discover contacts between registered elements and install an edge
    /// for every touching pair. Elements are never modified; existing edges
    /// are kept and a touching pair's payload is replaced.
    pub fn find_interactions(&mut self, config: &DiscoveryConfig) -> DiscoveryReport {
        self.find_interactions_with(&NativeKernel, config)
    }

    #[instrument(skip(self, kernel))]
    pub fn find_interactions_with<K: GeometryKernel + ?Sized>(
        &mut self,
        kernel: &K,
        config: &DiscoveryConfig,
    ) -> DiscoveryReport {
        let elements: Vec<&Element> = self.registry.iter().collect();
        let (candidates, skipped) = candidate_pairs(kernel, &elements, config);
        let tol = config.contact_tolerances();

        let mut found = Vec::new();
        let mut rejected = Vec::new();
        for &(a, b) in &candidates {
            let (Some(ea), Some(eb)) = (self.registry.get(a), self.registry.get(b)) else {
                continue;
            };
            let interfaces = ea.face_to_face_with(kernel, eb, &tol);
            if interfaces.is_empty() {
                debug!(%a, %b, "no contact");
                rejected.push((a, b));
            } else {
                found.push((a, b, Interaction::from_interfaces(interfaces)));
            }
        }

        let mut accepted = Vec::with_capacity(found.len());
        for (a, b, payload) in found {
            if self.graph.add_edge(a, b, Some(payload)) {
                accepted.push((a, b));
            }
        }
        info!(
            mode = ?config.mode,
            candidates = candidates.len(),
            edges = accepted.len(),
            skipped = skipped.len(),
            "interaction discovery finished"
        );
        DiscoveryReport {
            mode: config.mode,
            candidates,
            accepted,
            rejected,
            skipped,
        }
    }
}

/// Broad phase: candidate pairs (smaller identity first, sorted, never an
/// element with itself) and the elements skipped for lack of extent.
pub fn candidate_pairs<K: GeometryKernel + ?Sized>(
    kernel: &K,
    elements: &[&Element],
    config: &DiscoveryConfig,
) -> (Vec<(ElementId, ElementId)>, Vec<ElementId>) {
    let mut live: Vec<(&Element, BoundingBox)> = Vec::with_capacity(elements.len());
    let mut skipped = Vec::new();
    for &e in elements {
        let bb = e.aabb_with(kernel, config.aabb_inflation);
        if bb.is_empty() {
            debug!(id = %e.id(), "element has no extent, skipped");
            skipped.push(e.id());
        } else {
            live.push((e, bb));
        }
    }

    let mut pairs: BTreeSet<(ElementId, ElementId)> = BTreeSet::new();
    match config.mode {
        DiscoveryMode::BruteForce => {
            for (i, (a, bb_a)) in live.iter().enumerate() {
                for (b, bb_b) in &live[i + 1..] {
                    if bb_a.intersects(bb_b) {
                        pairs.insert(edge_key(a.id(), b.id()));
                    }
                }
            }
        }
        DiscoveryMode::KdTree => {
            let tree = KdTree::new(live.iter().enumerate().map(|(i, (e, _))| (e.center(), i)));
            for (i, (e, _)) in live.iter().enumerate() {
                let center = e.center();
                let neighbours = match config.radius {
                    Some(r) => tree.radius_where(&center, r, |&j| j != i),
                    None => tree.knn_where(&center, config.max_neighbours, |&j| j != i),
                };
                for n in neighbours {
                    pairs.insert(edge_key(e.id(), live[*n.payload].0.id()));
                }
            }
        }
        DiscoveryMode::AabbTree => {
            let reach = live
                .iter()
                .map(|(_, bb)| {
                    let s = bb.size();
                    s.x.max(s.y).max(s.z) / 2.0
                })
                .fold(0.0_f64, f64::max);
            let tree = KdTree::new(live.iter().enumerate().map(|(i, (_, bb))| (bb.center(), i)));
            for (i, (e, bb)) in live.iter().enumerate() {
                let window = bb.expanded(reach);
                for n in tree.range_aabb_where(&window, |&j| j > i) {
                    let (other, other_bb) = &live[*n.payload];
                    if bb.intersects(other_bb) {
                        pairs.insert(edge_key(e.id(), other.id()));
                    }
                }
            }
        }
    }
    (pairs.into_iter().collect(), skipped)
}

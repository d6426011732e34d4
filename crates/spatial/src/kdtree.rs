//! Static 3D k-d tree with nearest-neighbour and range queries.
//!
//! Nodes live in a flat arena. At each level the entries are sorted on the
//! splitting axis (ties by insertion index) and the median position becomes
//! the node. Left entries are at or below the pivot on that axis and right
//! entries at or above it, so coincident points still halve at every level
//! and the depth stays logarithmic.
//!
//! Results with equal distance come back in insertion order.

use std::cmp::Ordering;

use assembly_geometry::{BoundingBox, Point3d};
use tracing::debug;

const DIM: usize = 3;

/// A query result from [`KdTree::knn`] or [`KdTree::radius`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour<'a, T> {
    /// Insertion index of the entry.
    pub index: usize,
    pub point: Point3d,
    pub distance_squared: f64,
    pub payload: &'a T,
}

#[derive(Debug, Clone)]
struct Node {
    entry: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct KdTree<T> {
    entries: Vec<(Point3d, T)>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl<T> KdTree<T> {
    pub fn new(items: impl IntoIterator<Item = (Point3d, T)>) -> Self {
        let entries: Vec<(Point3d, T)> = items.into_iter().collect();
        let mut tree = Self {
            nodes: Vec::with_capacity(entries.len()),
            entries,
            root: None,
        };
        let order: Vec<usize> = (0..tree.entries.len()).collect();
        tree.root = tree.build(order, 0);
        debug!(entries = tree.entries.len(), "k-d tree built");
        tree
    }

    fn build(&mut self, mut order: Vec<usize>, depth: usize) -> Option<usize> {
        if order.is_empty() {
            return None;
        }
        let axis = depth % DIM;
        let entries = &self.entries;
        order.sort_by(|&a, &b| {
            entries[a].0
                .coord(axis)
                .total_cmp(&entries[b].0.coord(axis))
                .then(a.cmp(&b))
        });
        let mid = order.len() / 2;
        let right = order.split_off(mid + 1);
        let entry = order[mid];
        order.truncate(mid);

        let slot = self.nodes.len();
        self.nodes.push(Node {
            entry,
            axis,
            left: None,
            right: None,
        });
        let left = self.build(order, depth + 1);
        let right = self.build(right, depth + 1);
        self.nodes[slot].left = left;
        self.nodes[slot].right = right;
        Some(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Point3d, &T)> {
        self.entries.iter().map(|(p, t)| (p, t))
    }

    fn neighbour(&self, index: usize, distance_squared: f64) -> Neighbour<'_, T> {
        let (point, payload) = &self.entries[index];
        Neighbour {
            index,
            point: *point,
            distance_squared,
            payload,
        }
    }

    // ─── k nearest ──────────────────────────────────────────────────────

    /// The `k` entries closest to `q`, nearest first.
    pub fn knn(&self, q: &Point3d, k: usize) -> Vec<Neighbour<'_, T>> {
        self.knn_where(q, k, |_| true)
    }

    /// Like [`KdTree::knn`], considering only entries whose payload passes
    /// `predicate`.
    pub fn knn_where<F: Fn(&T) -> bool>(&self, q: &Point3d, k: usize, predicate: F) -> Vec<Neighbour<'_, T>> {
        let mut best: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        if k > 0 {
            self.knn_visit(self.root, q, k, &predicate, &mut best);
        }
        best.into_iter().map(|(d, i)| self.neighbour(i, d)).collect()
    }

    fn knn_visit<F: Fn(&T) -> bool>(
        &self,
        node: Option<usize>,
        q: &Point3d,
        k: usize,
        predicate: &F,
        best: &mut Vec<(f64, usize)>,
    ) {
        let Some(n) = node else {
            return;
        };
        let node = &self.nodes[n];
        let (p, payload) = &self.entries[node.entry];
        if predicate(payload) {
            offer(best, k, (p.distance_squared_to(q), node.entry));
        }

        let diff = q.coord(node.axis) - p.coord(node.axis);
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        self.knn_visit(near, q, k, predicate, best);
        let worst = if best.len() < k {
            f64::INFINITY
        } else {
            best[best.len() - 1].0
        };
        // Equal separation can still hold a tied entry with a lower index.
        if diff * diff <= worst {
            self.knn_visit(far, q, k, predicate, best);
        }
    }

    // ─── Radius ─────────────────────────────────────────────────────────

    /// Every entry within distance `r` of `q`, nearest first.
    pub fn radius(&self, q: &Point3d, r: f64) -> Vec<Neighbour<'_, T>> {
        self.radius_where(q, r, |_| true)
    }

    pub fn radius_where<F: Fn(&T) -> bool>(&self, q: &Point3d, r: f64, predicate: F) -> Vec<Neighbour<'_, T>> {
        let mut hits = Vec::new();
        if r >= 0.0 {
            self.radius_visit(self.root, q, r * r, &predicate, &mut hits);
        }
        hits.sort_by(by_distance_then_index);
        hits.into_iter().map(|(d, i)| self.neighbour(i, d)).collect()
    }

    fn radius_visit<F: Fn(&T) -> bool>(
        &self,
        node: Option<usize>,
        q: &Point3d,
        r2: f64,
        predicate: &F,
        hits: &mut Vec<(f64, usize)>,
    ) {
        let Some(n) = node else {
            return;
        };
        let node = &self.nodes[n];
        let (p, payload) = &self.entries[node.entry];
        let d2 = p.distance_squared_to(q);
        if d2 <= r2 && predicate(payload) {
            hits.push((d2, node.entry));
        }
        let diff = q.coord(node.axis) - p.coord(node.axis);
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        self.radius_visit(near, q, r2, predicate, hits);
        if diff * diff <= r2 {
            self.radius_visit(far, q, r2, predicate, hits);
        }
    }

    // ─── Box range ──────────────────────────────────────────────────────

    /// Entries inside `bbox` (boundary included), in insertion order.
    pub fn range_aabb(&self, bbox: &BoundingBox) -> Vec<Neighbour<'_, T>> {
        self.range_aabb_where(bbox, |_| true)
    }

    /// Like [`KdTree::range_aabb`], keeping only payloads that pass
    /// `predicate`. `distance_squared` is measured to the box center.
    pub fn range_aabb_where<F: Fn(&T) -> bool>(&self, bbox: &BoundingBox, predicate: F) -> Vec<Neighbour<'_, T>> {
        let mut found = Vec::new();
        if !bbox.is_empty() {
            self.range_visit(self.root, bbox, &predicate, &mut found);
        }
        found.sort_unstable();
        let center = bbox.center();
        found
            .into_iter()
            .map(|i| self.neighbour(i, self.entries[i].0.distance_squared_to(&center)))
            .collect()
    }

    fn range_visit<F: Fn(&T) -> bool>(
        &self,
        node: Option<usize>,
        bbox: &BoundingBox,
        predicate: &F,
        found: &mut Vec<usize>,
    ) {
        let Some(n) = node else {
            return;
        };
        let node = &self.nodes[n];
        let (p, payload) = &self.entries[node.entry];
        if bbox.contains_point(p) && predicate(payload) {
            found.push(node.entry);
        }
        let split = p.coord(node.axis);
        if bbox.min.coord(node.axis) <= split {
            self.range_visit(node.left, bbox, predicate, found);
        }
        if bbox.max.coord(node.axis) >= split {
            self.range_visit(node.right, bbox, predicate, found);
        }
    }
}

fn by_distance_then_index(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Insert `candidate` into the sorted best list, keeping at most `k`.
fn offer(best: &mut Vec<(f64, usize)>, k: usize, candidate: (f64, usize)) {
    let pos = best
        .binary_search_by(|probe| by_distance_then_index(probe, &candidate))
        .unwrap_or_else(|e| e);
    if pos >= k {
        return;
    }
    best.insert(pos, candidate);
    best.truncate(k);
}

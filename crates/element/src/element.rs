//! The element: identity, geometry bundle, frames and derived bounds.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use assembly_geometry::{
    BoundingBox, Frame, Geometry, GeometryKernel, Mesh, NativeKernel, Point3d, Transform,
};
use serde::{Deserialize, Serialize};

use crate::id::ElementId;
use crate::records::SideRecords;

/// Common element names.
pub mod names {
    pub const BLOCK: &str = "BLOCK";
    pub const BEAM: &str = "BEAM";
    pub const PLATE: &str = "PLATE";
    pub const FRAME: &str = "FRAME";
    pub const CUSTOM: &str = "CUSTOM";
}

/// Lazily filled bounding volumes. Emptied by every transform.
#[derive(Debug, Clone, Default)]
struct BoundsCache {
    aabb: OnceLock<BoundingBox>,
    local_box: OnceLock<Option<BoundingBox>>,
    convex_hull: OnceLock<Mesh>,
}

/// A rigid geometric object with a stable identity.
///
/// Equality is by identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(rename = "identity")]
    id: ElementId,
    #[serde(default)]
    pub index_path: Vec<i64>,
    geometry_simplified: Geometry,
    #[serde(default)]
    geometry: Vec<Geometry>,
    local_frame: Frame,
    global_frame: Frame,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub fabrication: SideRecords,
    #[serde(default)]
    pub structure: SideRecords,
    #[serde(skip)]
    cache: BoundsCache,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl Element {
    /// New element with a fresh identity. Both frames are world-aligned and
    /// anchored at the natural origin of `simplified`.
    pub fn new(name: impl Into<String>, simplified: Geometry, geometry: Vec<Geometry>) -> Self {
        let origin = simplified.natural_origin().unwrap_or(Point3d::ORIGIN);
        Self {
            name: name.into(),
            id: ElementId::new(),
            index_path: Vec::new(),
            geometry_simplified: simplified,
            geometry,
            local_frame: Frame::world_at(origin),
            global_frame: Frame::world_at(origin),
            attributes: BTreeMap::new(),
            fabrication: SideRecords::new(),
            structure: SideRecords::new(),
            cache: BoundsCache::default(),
        }
    }

    pub fn with_index_path(mut self, index_path: Vec<i64>) -> Self {
        self.index_path = index_path;
        self
    }

    pub fn with_local_frame(mut self, frame: Frame) -> Self {
        self.local_frame = frame;
        self.cache = BoundsCache::default();
        self
    }

    pub fn with_global_frame(mut self, frame: Frame) -> Self {
        self.global_frame = frame;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn geometry_simplified(&self) -> &Geometry {
        &self.geometry_simplified
    }

    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    pub fn local_frame(&self) -> &Frame {
        &self.local_frame
    }

    pub fn global_frame(&self) -> &Frame {
        &self.global_frame
    }

    pub fn add_geometry(&mut self, geometry: Geometry) {
        self.geometry.push(geometry);
        self.cache = BoundsCache::default();
    }

    /// Same contents under a new identity.
    pub fn copy_with_fresh_identity(&self) -> Self {
        Self {
            id: ElementId::new(),
            ..self.clone()
        }
    }

    pub fn has_cached_bounds(&self) -> bool {
        self.cache.aabb.get().is_some()
            || self.cache.local_box.get().is_some()
            || self.cache.convex_hull.get().is_some()
    }

    // ─── Transformations ────────────────────────────────────────────────

    /// Move the simplified geometry, every full geometry and both frames by
    /// `t`, then drop all cached bounds.
    pub fn transform(&mut self, t: &Transform) {
        self.transform_with(&NativeKernel, t);
    }

    pub fn transform_with<K: GeometryKernel + ?Sized>(&mut self, kernel: &K, t: &Transform) {
        self.geometry_simplified = kernel.transform_apply(t, &self.geometry_simplified);
        for g in &mut self.geometry {
            *g = kernel.transform_apply(t, g);
        }
        self.local_frame = self.local_frame.transformed(t);
        self.global_frame = self.global_frame.transformed(t);
        self.cache = BoundsCache::default();
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        let mut out = self.clone();
        out.transform(t);
        out
    }

    /// Move the element so that its local frame lands on `target`.
    pub fn transform_to_frame(&mut self, target: &Frame) {
        let t = NativeKernel.transform_to_frame(&self.local_frame, target);
        self.transform(&t);
    }

    // ─── Derived geometry ───────────────────────────────────────────────

    /// Meshes among the full geometries (boxes are meshed on the fly).
    pub fn meshes(&self) -> Vec<Mesh> {
        self.geometry.iter().filter_map(Geometry::to_mesh).collect()
    }

    /// Sample points of every full geometry, or of the simplified geometry
    /// when the element has no full geometry.
    pub fn sample_points(&self) -> Vec<Point3d> {
        if self.geometry.is_empty() {
            return self.geometry_simplified.sample_points();
        }
        self.geometry.iter().flat_map(Geometry::sample_points).collect()
    }

    /// Centroid of the simplified geometry, used by spatial queries.
    pub fn center(&self) -> Point3d {
        NativeKernel
            .centroid(&self.geometry_simplified.sample_points())
            .unwrap_or(self.local_frame.point)
    }

    /// World-space AABB of the full geometries, grown by `inflate`.
    ///
    /// When the full geometry yields no points the result is a cube of half-size `inflate`
    /// around the local frame origin, or the empty box when `inflate <= 0`.
    pub fn aabb(&self, inflate: f64) -> BoundingBox {
        self.aabb_with(&NativeKernel, inflate)
    }

    pub fn aabb_with<K: GeometryKernel + ?Sized>(&self, kernel: &K, inflate: f64) -> BoundingBox {
        let bb = self.cache.aabb.get_or_init(|| {
            self.geometry
                .iter()
                .map(|g| kernel.aabb(&g.sample_points()))
                .fold(BoundingBox::empty(), |acc, b| acc.union(&b))
        });
        if bb.is_empty() {
            return if inflate > 0.0 {
                BoundingBox::cube(self.local_frame.point, inflate)
            } else {
                BoundingBox::empty()
            };
        }
        bb.expanded(inflate)
    }

    /// Object-oriented box: the AABB of all sample points measured in the
    /// local frame, inflated, with its eight corners mapped back to world.
    /// Corner order matches [`BoundingBox::corners`].
    pub fn oobb(&self, inflate: f64) -> Option<[Point3d; 8]> {
        let local = self.cache.local_box.get_or_init(|| {
            let pts: Vec<Point3d> = self
                .sample_points()
                .iter()
                .map(|p| self.local_frame.to_local(p))
                .collect();
            let bb = BoundingBox::from_points(&pts);
            (!bb.is_empty()).then_some(bb)
        });
        let local = (*local)?.expanded(inflate);
        Some(local.corners().map(|c| self.local_frame.to_world(&c)))
    }

    /// Convex hull of all sample points; empty for fewer than three
    /// non-collinear points.
    pub fn convex_hull(&self) -> &Mesh {
        self.cache
            .convex_hull
            .get_or_init(|| NativeKernel.convex_hull(&self.sample_points()))
    }

    /// Broad-phase test: world AABBs overlap.
    pub fn has_collision(&self, other: &Element) -> bool {
        self.aabb(0.0).intersects(&other.aabb(0.0))
    }
}

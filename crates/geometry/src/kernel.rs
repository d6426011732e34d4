//! The geometry kernel seam.
//!
//! Elements and discovery only talk to geometry through [`GeometryKernel`].
//! [`NativeKernel`] is the in-crate implementation; another kernel can be
//! swapped in by implementing the trait.

use crate::bbox::BoundingBox;
use crate::frame::Frame;
use crate::hull;
use crate::mesh::Mesh;
use crate::plane::{self, Line, Plane};
use crate::point::{self, Point3d};
use crate::polygon::{self, Polygon};
use crate::shape::Geometry;
use crate::transform::Transform;
use crate::vector::Vec3;

/// Geometric capabilities required by the assembly model.
///
/// Every operation is total: degenerate input yields `None`, an empty mesh or
/// an empty box, never a panic.
pub trait GeometryKernel {
    /// Transform taking coordinates expressed in `from` to the same
    /// coordinates expressed in `to`.
    fn transform_to_frame(&self, from: &Frame, to: &Frame) -> Transform;

    fn transform_apply(&self, t: &Transform, geometry: &Geometry) -> Geometry;

    fn aabb(&self, points: &[Point3d]) -> BoundingBox;

    fn convex_hull(&self, points: &[Point3d]) -> Mesh;

    fn centroid(&self, points: &[Point3d]) -> Option<Point3d>;

    fn face_normal(&self, mesh: &Mesh, face: usize) -> Option<Vec3>;

    fn intersection_line_plane(&self, line: &Line, plane: &Plane, tol: f64) -> Option<Point3d>;

    /// Overlap of `a` and `b` projected onto `plane`.
    fn polygon_polygon_planar_overlap(
        &self,
        a: &Polygon,
        b: &Polygon,
        plane: &Plane,
        tol: f64,
    ) -> Option<Polygon>;
}

/// Kernel backed by this crate's own routines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeKernel;

impl GeometryKernel for NativeKernel {
    fn transform_to_frame(&self, from: &Frame, to: &Frame) -> Transform {
        Transform::from_frame_to_frame(from, to)
    }

    fn transform_apply(&self, t: &Transform, geometry: &Geometry) -> Geometry {
        geometry.transformed(t)
    }

    fn aabb(&self, points: &[Point3d]) -> BoundingBox {
        BoundingBox::from_points(points)
    }

    fn convex_hull(&self, points: &[Point3d]) -> Mesh {
        hull::convex_hull(points)
    }

    fn centroid(&self, points: &[Point3d]) -> Option<Point3d> {
        point::centroid(points)
    }

    fn face_normal(&self, mesh: &Mesh, face: usize) -> Option<Vec3> {
        mesh.face_normal(face)
    }

    fn intersection_line_plane(&self, line: &Line, plane: &Plane, tol: f64) -> Option<Point3d> {
        plane::intersection_line_plane(line, plane, tol)
    }

    fn polygon_polygon_planar_overlap(
        &self,
        a: &Polygon,
        b: &Polygon,
        plane: &Plane,
        tol: f64,
    ) -> Option<Polygon> {
        polygon::polygon_polygon_planar_overlap(a, b, plane, tol)
    }
}

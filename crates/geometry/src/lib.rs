pub mod bbox;
pub mod frame;
pub mod hull;
pub mod kernel;
pub mod mesh;
pub mod plane;
pub mod point;
pub mod polygon;
pub mod shape;
pub mod transform;
pub mod vector;

pub use bbox::BoundingBox;
pub use frame::Frame;
pub use hull::convex_hull;
pub use kernel::{GeometryKernel, NativeKernel};
pub use mesh::Mesh;
pub use plane::{Line, Plane, intersection_line_plane};
pub use point::{Point2d, Point3d, centroid};
pub use polygon::{Polygon, polygon_polygon_planar_overlap};
pub use shape::{Geometry, Polyline};
pub use transform::Transform;
pub use vector::Vec3;

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
    /// Areas smaller than this are considered zero.
    pub area: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            angular: 1e-9,
            area: 1e-12,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }

    pub fn is_zero_angle(&self, angle: f64) -> bool {
        angle.abs() < self.angular
    }

    pub fn is_zero_area(&self, area: f64) -> bool {
        area.abs() < self.area
    }

    pub fn aabb_approx_eq(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        (a.is_empty() && b.is_empty()) || a.approx_eq(b, self.coincidence)
    }
}

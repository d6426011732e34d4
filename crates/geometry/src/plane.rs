use serde::{Deserialize, Serialize};

use crate::point::{Point2d, Point3d};
use crate::vector::Vec3;

/// An infinite plane with an in-plane (u, v) parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl Plane {
    /// `None` when `normal` is zero-length.
    pub fn try_new(origin: Point3d, normal: Vec3) -> Option<Self> {
        let normal = normal.normalized()?;
        let u_axis = normal.any_perpendicular();
        let v_axis = normal.cross(&u_axis);
        Some(Self {
            origin,
            normal,
            u_axis,
            v_axis,
        })
    }

    /// Plane through `origin`; a zero-length normal falls back to +Z.
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        Self::try_new(origin, normal.normalized_or(Vec3::Z)).unwrap_or_else(|| Self::xy_at(origin))
    }

    fn xy_at(origin: Point3d) -> Self {
        Self {
            origin,
            normal: Vec3::Z,
            u_axis: Vec3::X,
            v_axis: Vec3::Y,
        }
    }

    pub fn xy() -> Self {
        Self::xy_at(Point3d::ORIGIN)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.origin + self.u_axis * u + self.v_axis * v
    }

    /// Signed distance, positive on the side the normal points to.
    pub fn distance_to_point(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    pub fn project_point(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.distance_to_point(p)
    }

    /// (u, v) parameters of `p` projected onto the plane.
    pub fn parameters_of(&self, p: &Point3d) -> Point2d {
        let v = *p - self.origin;
        Point2d::new(v.dot(&self.u_axis), v.dot(&self.v_axis))
    }

    pub fn point_at(&self, uv: &Point2d) -> Point3d {
        self.evaluate(uv.x, uv.y)
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3d,
    pub end: Point3d,
}

impl Line {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> Point3d {
        self.start.midpoint(&self.end)
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        self.start.lerp(&self.end, t)
    }
}

/// Intersection of the infinite line through `line` with `plane`.
///
/// Returns `None` for a degenerate line or when the line direction is within
/// `tol` of lying in the plane.
pub fn intersection_line_plane(line: &Line, plane: &Plane, tol: f64) -> Option<Point3d> {
    let dir = line.direction().normalized()?;
    let denom = dir.dot(&plane.normal);
    if denom.abs() < tol {
        return None;
    }
    let t = (plane.origin - line.start).dot(&plane.normal) / denom;
    Some(line.start + dir * t)
}

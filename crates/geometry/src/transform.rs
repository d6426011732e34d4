use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::point::Point3d;
use crate::vector::Vec3;

/// A 4x4 affine transformation.
///
/// Points are treated as column vectors, so `a.then(&b)` is the matrix
/// product `b * a`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_matrix(Matrix4::new_translation(&Vector3::new(dx, dy, dz)))
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s, s)
    }

    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::X, angle)
    }

    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::Y, angle)
    }

    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::Z, angle)
    }

    /// Rotation around an axis through the origin by `angle` radians.
    /// A zero-length axis yields the identity.
    pub fn rotation_axis_angle(axis: Vec3, angle: f64) -> Self {
        match Unit::try_new(Vector3::new(axis.x, axis.y, axis.z), 1e-15) {
            Some(axis) => Self::from_matrix(Rotation3::from_axis_angle(&axis, angle).to_homogeneous()),
            None => Self::identity(),
        }
    }

    /// Rotation around the axis through `center` along `axis`.
    pub fn rotation_about(center: Point3d, axis: Vec3, angle: f64) -> Self {
        Self::translation(-center.x, -center.y, -center.z)
            .then(&Self::rotation_axis_angle(axis, angle))
            .then(&Self::translation(center.x, center.y, center.z))
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform::from_matrix(next.matrix * self.matrix)
    }

    /// The inverse transform. Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let q = self.matrix.transform_point(&Point3::new(p.x, p.y, p.z));
        Point3d::new(q.x, q.y, q.z)
    }

    /// Transform a direction (no translation).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let w = self.matrix.transform_vector(&Vector3::new(v.x, v.y, v.z));
        Vec3::new(w.x, w.y, w.z)
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

//! Orthonormal right-handed frames and frame-to-frame changes of basis.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::plane::Plane;
use crate::point::Point3d;
use crate::transform::Transform;
use crate::vector::Vec3;

/// An origin plus an orthonormal, right-handed set of axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub point: Point3d,
    pub xaxis: Vec3,
    pub yaxis: Vec3,
}

impl Frame {
    pub fn world() -> Self {
        Self {
            point: Point3d::ORIGIN,
            xaxis: Vec3::X,
            yaxis: Vec3::Y,
        }
    }

    /// World-aligned frame anchored at `point`.
    pub fn world_at(point: Point3d) -> Self {
        Self {
            point,
            ..Self::world()
        }
    }

    /// Orthonormalize `xaxis`/`yaxis` into a frame. `None` if the axes are
    /// zero-length or parallel.
    pub fn try_new(point: Point3d, xaxis: Vec3, yaxis: Vec3) -> Option<Self> {
        let x = xaxis.normalized()?;
        let z = x.cross(&yaxis).normalized()?;
        let y = z.cross(&x);
        Some(Self {
            point,
            xaxis: x,
            yaxis: y,
        })
    }

    /// Like [`Frame::try_new`], falling back to world axes at `point` when the
    /// given axes are degenerate.
    pub fn new(point: Point3d, xaxis: Vec3, yaxis: Vec3) -> Self {
        Self::try_new(point, xaxis, yaxis).unwrap_or_else(|| Self::world_at(point))
    }

    /// Frame whose z-axis is the plane normal.
    pub fn from_plane(plane: &Plane) -> Self {
        Self {
            point: plane.origin,
            xaxis: plane.u_axis,
            yaxis: plane.v_axis,
        }
    }

    /// Frame with origin `point` and z-axis along `normal`.
    pub fn from_point_normal(point: Point3d, normal: Vec3) -> Self {
        Self::from_plane(&Plane::new(point, normal))
    }

    pub fn zaxis(&self) -> Vec3 {
        self.xaxis.cross(&self.yaxis)
    }

    pub fn plane(&self) -> Plane {
        Plane {
            origin: self.point,
            normal: self.zaxis(),
            u_axis: self.xaxis,
            v_axis: self.yaxis,
        }
    }

    /// Maps local coordinates of this frame to world coordinates.
    pub fn to_world_transform(&self) -> Transform {
        let (x, y, z, p) = (self.xaxis, self.yaxis, self.zaxis(), self.point);
        #[rustfmt::skip]
        let m = Matrix4::new(
            x.x, y.x, z.x, p.x,
            x.y, y.y, z.y, p.y,
            x.z, y.z, z.z, p.z,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform::from_matrix(m)
    }

    /// Maps world coordinates to local coordinates of this frame.
    pub fn to_local_transform(&self) -> Transform {
        let (x, y, z) = (self.xaxis, self.yaxis, self.zaxis());
        let p = self.point.to_vec3();
        #[rustfmt::skip]
        let m = Matrix4::new(
            x.x, x.y, x.z, -x.dot(&p),
            y.x, y.y, y.z, -y.dot(&p),
            z.x, z.y, z.z, -z.dot(&p),
            0.0, 0.0, 0.0, 1.0,
        );
        Transform::from_matrix(m)
    }

    pub fn to_local(&self, p: &Point3d) -> Point3d {
        let v = *p - self.point;
        Point3d::new(v.dot(&self.xaxis), v.dot(&self.yaxis), v.dot(&self.zaxis()))
    }

    pub fn to_world(&self, p: &Point3d) -> Point3d {
        self.point + self.xaxis * p.x + self.yaxis * p.y + self.zaxis() * p.z
    }

    /// Apply `t` to origin and axes, re-orthonormalizing the result.
    pub fn transformed(&self, t: &Transform) -> Self {
        let point = t.transform_point(&self.point);
        let x = t.transform_vector(&self.xaxis);
        let y = t.transform_vector(&self.yaxis);
        Self::new(point, x, y)
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.point.approx_eq(&other.point, tol)
            && (self.xaxis - other.xaxis).length() <= tol
            && (self.yaxis - other.yaxis).length() <= tol
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::world()
    }
}

impl Transform {
    /// The change of basis that carries geometry expressed relative to `from`
    /// into the same relative placement in `to`.
    pub fn from_frame_to_frame(from: &Frame, to: &Frame) -> Self {
        from.to_local_transform().then(&to.to_world_transform())
    }
}

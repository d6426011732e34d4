//! Polygonal face-vertex meshes.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::frame::Frame;
use crate::point::Point3d;
use crate::polygon::Polygon;
use crate::transform::Transform;
use crate::vector::Vec3;

/// A face-vertex mesh with polygonal faces.
///
/// Faces list vertex indices counter-clockwise when seen from outside, so
/// face normals point outward on a closed, consistently oriented mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3d>, faces: Vec<Vec<usize>>) -> Self {
        Self { vertices, faces }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Every face index refers to an existing vertex.
    pub fn is_valid(&self) -> bool {
        self.faces
            .iter()
            .all(|f| f.len() >= 3 && f.iter().all(|&i| i < self.vertices.len()))
    }

    /// Axis-aligned box of `xsize * ysize * zsize` centered on `frame`.
    pub fn from_box(frame: &Frame, xsize: f64, ysize: f64, zsize: f64) -> Self {
        let (hx, hy, hz) = (xsize * 0.5, ysize * 0.5, zsize * 0.5);
        let local = BoundingBox::new(Point3d::new(-hx, -hy, -hz), Point3d::new(hx, hy, hz));
        let vertices = local.corners().iter().map(|p| frame.to_world(p)).collect();
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        Self::new(vertices, faces)
    }

    /// Closed prism between two rings of equal length (bottom and top outline).
    /// `None` when the rings differ in length or have fewer than three points.
    pub fn loft(bottom: &[Point3d], top: &[Point3d]) -> Option<Self> {
        let n = bottom.len();
        if n < 3 || top.len() != n {
            return None;
        }
        let mut vertices = bottom.to_vec();
        vertices.extend_from_slice(top);

        let mut faces = Vec::with_capacity(n + 2);
        faces.push((0..n).rev().collect());
        faces.push((n..2 * n).collect());
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(vec![i, j, n + j, n + i]);
        }

        let mut mesh = Self::new(vertices, faces);
        if mesh.signed_volume() < 0.0 {
            mesh.flip_faces();
        }
        Some(mesh)
    }

    pub fn face_points(&self, face: usize) -> Option<Vec<Point3d>> {
        let indices = self.faces.get(face)?;
        indices.iter().map(|&i| self.vertices.get(i).copied()).collect()
    }

    pub fn face_polygon(&self, face: usize) -> Option<Polygon> {
        self.face_points(face).map(Polygon::new)
    }

    /// Unit normal of a face; `None` for a missing or degenerate face.
    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        self.face_polygon(face)?.normal()
    }

    pub fn face_area(&self, face: usize) -> f64 {
        self.face_polygon(face).map(|p| p.area()).unwrap_or(0.0)
    }

    pub fn face_centroid(&self, face: usize) -> Option<Point3d> {
        self.face_polygon(face)?.centroid()
    }

    pub fn reverse_face(&mut self, face: usize) {
        if let Some(f) = self.faces.get_mut(face) {
            f.reverse();
        }
    }

    pub fn flip_faces(&mut self) {
        for f in &mut self.faces {
            f.reverse();
        }
    }

    /// Signed enclosed volume (positive for outward-oriented closed meshes).
    pub fn signed_volume(&self) -> f64 {
        let mut vol = 0.0;
        for f in 0..self.faces.len() {
            let Some(pts) = self.face_points(f) else {
                continue;
            };
            let p0 = pts[0].to_vec3();
            for w in pts.windows(2).skip(1) {
                vol += p0.dot(&w[0].to_vec3().cross(&w[1].to_vec3())) / 6.0;
            }
        }
        vol
    }

    pub fn centroid(&self) -> Option<Point3d> {
        crate::point::centroid(&self.vertices)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    pub fn transform(&mut self, t: &Transform) {
        for v in &mut self.vertices {
            *v = t.transform_point(v);
        }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        let mut out = self.clone();
        out.transform(t);
        out
    }
}

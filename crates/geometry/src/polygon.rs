//! Planar polygons: area, normal, centroid and planar overlap.
//!
//! Overlap works in the (u, v) parameter space of a supporting plane using
//! Sutherland-Hodgman clipping, so the clipping polygon has to be convex.
//! Faces of blocks, beams and plates are convex, which covers every contact
//! the discovery pipeline looks for.

use serde::{Deserialize, Serialize};

use crate::plane::Plane;
use crate::point::{Point2d, Point3d};
use crate::transform::Transform;
use crate::vector::Vec3;

/// A closed polygon given by its vertices (the closing edge is implicit).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point3d>,
}

impl Polygon {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Newell's vector: direction is the normal, length is twice the area.
    fn newell(&self) -> Vec3 {
        let n = self.points.len();
        let mut acc = Vec3::ZERO;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc.x += (a.y - b.y) * (a.z + b.z);
            acc.y += (a.z - b.z) * (a.x + b.x);
            acc.z += (a.x - b.x) * (a.y + b.y);
        }
        acc
    }

    /// Unit normal following the right-hand rule on the vertex order.
    pub fn normal(&self) -> Option<Vec3> {
        if self.points.len() < 3 {
            return None;
        }
        self.newell().normalized()
    }

    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        0.5 * self.newell().length()
    }

    /// Area-weighted centroid; falls back to the vertex mean for zero-area input.
    pub fn centroid(&self) -> Option<Point3d> {
        let mean = crate::point::centroid(&self.points)?;
        let Some(normal) = self.normal() else {
            return Some(mean);
        };
        let p0 = self.points[0];
        let mut weighted = Vec3::ZERO;
        let mut total = 0.0;
        for w in self.points.windows(2).skip(1) {
            let (a, b) = (w[0], w[1]);
            let signed = (a - p0).cross(&(b - p0)).dot(&normal) * 0.5;
            let c = (p0.to_vec3() + a.to_vec3() + b.to_vec3()) / 3.0;
            weighted = weighted + c * signed;
            total += signed;
        }
        if total.abs() < 1e-300 {
            return Some(mean);
        }
        let c = weighted / total;
        Some(Point3d::new(c.x, c.y, c.z))
    }

    /// Best-fit plane through the centroid; `None` if degenerate.
    pub fn plane(&self) -> Option<Plane> {
        let normal = self.normal()?;
        let origin = self.centroid()?;
        Plane::try_new(origin, normal)
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            points: self.points.iter().map(|p| t.transform_point(p)).collect(),
        }
    }

    /// Orthogonal projection of every vertex onto `plane`.
    pub fn projected(&self, plane: &Plane) -> Self {
        Self {
            points: self.points.iter().map(|p| plane.project_point(p)).collect(),
        }
    }
}

// ─── 2D helpers ─────────────────────────────────────────────────────────────

fn signed_area_2d(pts: &[Point2d]) -> f64 {
    let n = pts.len();
    let mut acc = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc
}

fn cross_2d(o: Point2d, a: Point2d, b: Point2d) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn is_convex_ccw(pts: &[Point2d], eps: f64) -> bool {
    let n = pts.len();
    (0..n).all(|i| cross_2d(pts[i], pts[(i + 1) % n], pts[(i + 2) % n]) >= -eps)
}

fn segment_line_hit(p: Point2d, q: Point2d, a: Point2d, b: Point2d) -> Point2d {
    let d1 = cross_2d(a, b, p);
    let d2 = cross_2d(a, b, q);
    let t = if (d1 - d2).abs() < 1e-300 { 0.0 } else { d1 / (d1 - d2) };
    Point2d::new(p.x + t * (q.x - p.x), p.y + t * (q.y - p.y))
}

/// Sutherland-Hodgman: clip `subject` by the convex, counter-clockwise `clip`.
fn clip_convex(subject: &[Point2d], clip: &[Point2d], eps: f64) -> Vec<Point2d> {
    let mut output = subject.to_vec();
    let m = clip.len();
    for i in 0..m {
        if output.is_empty() {
            break;
        }
        let (a, b) = (clip[i], clip[(i + 1) % m]);
        let input = std::mem::take(&mut output);
        let n = input.len();
        for j in 0..n {
            let cur = input[j];
            let prev = input[(j + n - 1) % n];
            let cur_in = cross_2d(a, b, cur) >= -eps;
            let prev_in = cross_2d(a, b, prev) >= -eps;
            if cur_in {
                if !prev_in {
                    output.push(segment_line_hit(prev, cur, a, b));
                }
                output.push(cur);
            } else if prev_in {
                output.push(segment_line_hit(prev, cur, a, b));
            }
        }
    }
    output
}

fn dedup_ring(pts: Vec<Point2d>, tol: f64) -> Vec<Point2d> {
    let mut out: Vec<Point2d> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last().is_none_or(|q| q.distance_to(&p) > tol) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].distance_to(&out[out.len() - 1]) <= tol {
        out.pop();
    }
    out
}

fn to_ccw_2d(polygon: &Polygon, plane: &Plane) -> Vec<Point2d> {
    let mut pts: Vec<Point2d> = polygon.points.iter().map(|p| plane.parameters_of(p)).collect();
    if signed_area_2d(&pts) < 0.0 {
        pts.reverse();
    }
    pts
}

/// Overlap of `a` and `b` after projecting both onto `plane`.
///
/// One of the two polygons must be convex. Returns `None` for degenerate
/// input (fewer than three vertices, zero area) or when the overlap has area
/// at most `tol * tol`. The result lies on `plane` and is counter-clockwise
/// around the plane normal.
pub fn polygon_polygon_planar_overlap(a: &Polygon, b: &Polygon, plane: &Plane, tol: f64) -> Option<Polygon> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }
    let zero_area = tol * tol;
    let a2 = to_ccw_2d(a, plane);
    let b2 = to_ccw_2d(b, plane);
    if signed_area_2d(&a2) <= zero_area || signed_area_2d(&b2) <= zero_area {
        return None;
    }

    let clipped = if is_convex_ccw(&b2, tol) {
        clip_convex(&a2, &b2, tol)
    } else if is_convex_ccw(&a2, tol) {
        clip_convex(&b2, &a2, tol)
    } else {
        return None;
    };

    let ring = dedup_ring(clipped, tol);
    if ring.len() < 3 || signed_area_2d(&ring) <= zero_area {
        return None;
    }
    Some(Polygon::new(ring.iter().map(|uv| plane.point_at(uv)).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64, z: f64) -> Polygon {
        Polygon::new(vec![
            Point3d::new(x0, y0, z),
            Point3d::new(x0 + size, y0, z),
            Point3d::new(x0 + size, y0 + size, z),
            Point3d::new(x0, y0 + size, z),
        ])
    }

    #[test]
    fn test_area_normal_centroid() {
        let sq = square(0.0, 0.0, 2.0, 1.0);
        approx::assert_abs_diff_eq!(sq.area(), 4.0, epsilon = 1e-12);
        assert!((sq.normal().unwrap() - Vec3::Z).length() < 1e-12);
        assert!(sq.centroid().unwrap().approx_eq(&Point3d::new(1.0, 1.0, 1.0), 1e-12));
        assert!((sq.reversed().normal().unwrap() + Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_centroid_is_area_weighted() {
        // L-shape: unit squares at (0,0),(1,0),(0,1). Centroid = (5/6, 5/6).
        let l = Polygon::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(1.0, 2.0, 0.0),
            Point3d::new(0.0, 2.0, 0.0),
        ]);
        let c = l.centroid().unwrap();
        assert!(c.approx_eq(&Point3d::new(5.0 / 6.0, 5.0 / 6.0, 0.0), 1e-12));
        approx::assert_abs_diff_eq!(l.area(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = Polygon::new(vec![
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
        ]);
        assert!(line.normal().is_none());
        assert_eq!(line.area(), 0.0);
        assert!(line.plane().is_none());
    }

    #[test]
    fn test_overlap_of_offset_squares() {
        let a = square(0.0, 0.0, 2.0, 0.0);
        let b = square(1.0, 1.0, 2.0, 0.0).reversed();
        let overlap = polygon_polygon_planar_overlap(&a, &b, &Plane::xy(), 1e-9).unwrap();
        approx::assert_abs_diff_eq!(overlap.area(), 1.0, epsilon = 1e-9);
        let c = overlap.centroid().unwrap();
        assert!(c.approx_eq(&Point3d::new(1.5, 1.5, 0.0), 1e-9));
    }

    #[test]
    fn test_overlap_projects_onto_plane() {
        let a = square(0.0, 0.0, 1.0, 0.0);
        let b = square(0.0, 0.0, 1.0, 0.5);
        let overlap = polygon_polygon_planar_overlap(&a, &b, &Plane::xy(), 1e-9).unwrap();
        approx::assert_abs_diff_eq!(overlap.area(), 1.0, epsilon = 1e-9);
        for p in &overlap.points {
            approx::assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_touching_squares_have_no_overlap() {
        let a = square(0.0, 0.0, 1.0, 0.0);
        let b = square(1.0, 0.0, 1.0, 0.0);
        assert!(polygon_polygon_planar_overlap(&a, &b, &Plane::xy(), 1e-9).is_none());
    }

    #[test]
    fn test_concave_subject_with_convex_clip() {
        let l = Polygon::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(1.0, 2.0, 0.0),
            Point3d::new(0.0, 2.0, 0.0),
        ]);
        let clip = square(0.0, 0.0, 2.0, 0.0);
        let overlap = polygon_polygon_planar_overlap(&l, &clip, &Plane::xy(), 1e-9).unwrap();
        approx::assert_abs_diff_eq!(overlap.area(), 3.0, epsilon = 1e-9);
    }
}

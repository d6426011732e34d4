//! Convex hull of a point set (incremental algorithm).

use std::collections::HashSet;

use tracing::debug;

use crate::bbox::BoundingBox;
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::point::{Point2d, Point3d};
use crate::vector::Vec3;

/// Convex hull of `points` as an outward-oriented triangle mesh.
///
/// Coplanar input yields a single polygonal face (the planar hull); fewer
/// than three non-collinear points yield an empty mesh.
pub fn convex_hull(points: &[Point3d]) -> Mesh {
    let bb = BoundingBox::from_points(points);
    if bb.is_empty() {
        return Mesh::empty();
    }
    let eps = 1e-9 * bb.size().length().max(1.0);

    let Some(seed) = initial_simplex(points, eps) else {
        return Mesh::empty();
    };
    match seed {
        Seed::Planar { plane } => planar_hull(points, &plane, eps),
        Seed::Solid(tetra) => solid_hull(points, tetra, eps),
    }
}

enum Seed {
    Planar { plane: Plane },
    Solid([usize; 4]),
}

fn farthest_by<F: Fn(&Point3d) -> f64>(points: &[Point3d], score: F) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, p) in points.iter().enumerate() {
        let s = score(p);
        if s > best.1 {
            best = (i, s);
        }
    }
    best
}

fn initial_simplex(points: &[Point3d], eps: f64) -> Option<Seed> {
    let p0 = points[0];
    let (i1, d1) = farthest_by(points, |p| p.distance_to(&p0));
    if d1 <= eps {
        return None;
    }
    let p1 = points[i1];
    let axis = p1 - p0;
    let (i2, d2) = farthest_by(points, |p| (*p - p0).cross(&axis).length() / axis.length());
    if d2 <= eps {
        return None;
    }
    let p2 = points[i2];
    let normal = axis.cross(&(p2 - p0)).normalized()?;
    let plane = Plane::try_new(p0, normal)?;
    let (i3, d3) = farthest_by(points, |p| plane.distance_to_point(p).abs());
    if d3 <= eps {
        return Some(Seed::Planar { plane });
    }
    Some(Seed::Solid([0, i1, i2, i3]))
}

/// Monotone-chain hull in the parameter space of `plane`.
fn planar_hull(points: &[Point3d], plane: &Plane, eps: f64) -> Mesh {
    let mut uv: Vec<(Point2d, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (plane.parameters_of(p), i))
        .collect();
    uv.sort_by(|a, b| a.0.x.total_cmp(&b.0.x).then(a.0.y.total_cmp(&b.0.y)));

    let cross = |o: Point2d, a: Point2d, b: Point2d| (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);
    let mut hull: Vec<(Point2d, usize)> = Vec::with_capacity(uv.len() * 2);
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &(Point2d, usize)>> = if pass == 0 {
            Box::new(uv.iter())
        } else {
            Box::new(uv.iter().rev())
        };
        for &item in iter {
            while hull.len() >= start + 2
                && cross(hull[hull.len() - 2].0, hull[hull.len() - 1].0, item.0) <= eps * eps
            {
                hull.pop();
            }
            hull.push(item);
        }
        hull.pop();
    }
    if hull.len() < 3 {
        return Mesh::empty();
    }
    let vertices: Vec<Point3d> = hull.iter().map(|(_, i)| points[*i]).collect();
    let face: Vec<usize> = (0..vertices.len()).collect();
    Mesh::new(vertices, vec![face])
}

fn solid_hull(points: &[Point3d], tetra: [usize; 4], eps: f64) -> Mesh {
    let interior = {
        let s = tetra
            .iter()
            .fold(Vec3::ZERO, |acc, &i| acc + points[i].to_vec3());
        let c = s / 4.0;
        Point3d::new(c.x, c.y, c.z)
    };

    let oriented = |a: usize, b: usize, c: usize| -> [usize; 3] {
        let n = (points[b] - points[a]).cross(&(points[c] - points[a]));
        if n.dot(&(points[a] - interior)) < 0.0 {
            [a, c, b]
        } else {
            [a, b, c]
        }
    };

    let [a, b, c, d] = tetra;
    let mut faces: Vec<[usize; 3]> = vec![
        oriented(a, b, c),
        oriented(a, b, d),
        oriented(a, c, d),
        oriented(b, c, d),
    ];

    let above = |f: &[usize; 3], p: &Point3d| -> f64 {
        let n = (points[f[1]] - points[f[0]]).cross(&(points[f[2]] - points[f[0]]));
        match n.normalized() {
            Some(n) => n.dot(&(*p - points[f[0]])),
            None => 0.0,
        }
    };

    for (pi, p) in points.iter().enumerate() {
        if tetra.contains(&pi) {
            continue;
        }
        let visible: Vec<bool> = faces.iter().map(|f| above(f, p) > eps).collect();
        if !visible.iter().any(|v| *v) {
            continue;
        }

        let visible_edges: HashSet<(usize, usize)> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, v)| **v)
            .flat_map(|(f, _)| [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])])
            .collect();
        let horizon: Vec<(usize, usize)> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, v)| **v)
            .flat_map(|(f, _)| [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])])
            .filter(|(u, w)| !visible_edges.contains(&(*w, *u)))
            .collect();

        let mut kept: Vec<[usize; 3]> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, v)| !**v)
            .map(|(f, _)| *f)
            .collect();
        kept.extend(horizon.into_iter().map(|(u, w)| [u, w, pi]));
        faces = kept;
    }

    // Compact the vertex list down to hull vertices.
    let mut remap = vec![usize::MAX; points.len()];
    let mut vertices = Vec::new();
    let faces: Vec<Vec<usize>> = faces
        .iter()
        .map(|f| {
            f.iter()
                .map(|&i| {
                    if remap[i] == usize::MAX {
                        remap[i] = vertices.len();
                        vertices.push(points[i]);
                    }
                    remap[i]
                })
                .collect()
        })
        .collect();
    debug!(vertices = vertices.len(), faces = faces.len(), "convex hull built");
    Mesh::new(vertices, faces)
}

//! Face-to-face contact detection between two elements.

use std::cmp::Ordering;

use assembly_geometry::{GeometryKernel, Mesh, NativeKernel, Tolerance};
use tracing::debug;

use crate::element::Element;
use crate::interface::Interface;

/// Thresholds for face-to-face contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactTolerances {
    /// Maximum distance between the two face planes.
    pub tol_dist: f64,
    /// Maximum deviation (radians) from exactly opposite normals.
    pub tol_angle: f64,
    /// Smallest overlap area that counts as a contact.
    pub min_area: f64,
}

impl Default for ContactTolerances {
    fn default() -> Self {
        Self {
            tol_dist: 1e-2,
            tol_angle: 1e-2,
            min_area: 1e-2,
        }
    }
}

impl Element {
    /// Planar contacts between the faces of this element's meshes and the
    /// faces of `other`'s meshes.
    ///
    /// Two faces touch when their normals are opposite within `tol_angle`
    /// and the centroid of the second face is within `tol_dist` of the first
    /// face's plane. The second face is projected onto that plane and
    /// overlapped with the first; overlaps of at least `min_area` become
    /// interfaces. Largest first, ties ordered by centroid.
    pub fn face_to_face(&self, other: &Element, tol: &ContactTolerances) -> Vec<Interface> {
        self.face_to_face_with(&NativeKernel, other, tol)
    }

    pub fn face_to_face_with<K: GeometryKernel + ?Sized>(
        &self,
        kernel: &K,
        other: &Element,
        tol: &ContactTolerances,
    ) -> Vec<Interface> {
        let mine = self.meshes();
        let theirs = other.meshes();
        let mut found = Vec::new();
        for a in &mine {
            for b in &theirs {
                mesh_contacts(kernel, a, b, tol, &mut found);
            }
        }
        found.sort_by(|x, y| {
            y.area
                .total_cmp(&x.area)
                .then_with(|| x.centroid().lex_cmp(&y.centroid()))
        });
        found
    }
}

fn mesh_contacts<K: GeometryKernel + ?Sized>(
    kernel: &K,
    a: &Mesh,
    b: &Mesh,
    tol: &ContactTolerances,
    out: &mut Vec<Interface>,
) {
    let overlap_tol = Tolerance::default().coincidence;
    for fa in 0..a.face_count() {
        let (Some(poly_a), Some(normal_a)) = (a.face_polygon(fa), kernel.face_normal(a, fa)) else {
            debug!(face = fa, "skipping degenerate face");
            continue;
        };
        let Some(plane_a) = poly_a.plane() else {
            continue;
        };
        for fb in 0..b.face_count() {
            let (Some(poly_b), Some(normal_b)) = (b.face_polygon(fb), kernel.face_normal(b, fb)) else {
                continue;
            };
            if !normal_a.is_antiparallel_to(&normal_b, tol.tol_angle) {
                continue;
            }
            let Some(centroid_b) = poly_b.centroid() else {
                continue;
            };
            if plane_a.distance_to_point(&centroid_b).abs() > tol.tol_dist {
                continue;
            }
            let projected = poly_b.projected(&plane_a);
            let Some(overlap) = kernel.polygon_polygon_planar_overlap(&poly_a, &projected, &plane_a, overlap_tol)
            else {
                continue;
            };
            let interface = Interface::new(overlap, normal_a);
            if interface.area >= tol.min_area {
                out.push(interface);
            }
        }
    }
}

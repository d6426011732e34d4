//! Canonical geometry bundles for the common element kinds.

use assembly_geometry::{Frame, Geometry, Line, Mesh, Point3d, Polygon, Polyline};
use tracing::{debug, instrument};

use crate::element::{Element, names};
use crate::error::ElementError;

fn require_positive(label: &str, value: f64) -> Result<(), ElementError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ElementError::invalid(format!("{label} must be positive, got {value}")))
    }
}

impl Element {
    /// A point-like element with no full geometry.
    pub fn from_point(name: impl Into<String>, point: Point3d) -> Self {
        Element::new(name, Geometry::Point(point), Vec::new())
    }

    /// A block from a closed mesh; the simplified geometry is the mesh centroid.
    #[instrument(skip(mesh), fields(vertices = mesh.vertex_count(), faces = mesh.face_count()))]
    pub fn from_mesh(name: &str, mesh: Mesh) -> Result<Self, ElementError> {
        if mesh.is_empty() || !mesh.is_valid() {
            return Err(ElementError::invalid("mesh has no valid faces"));
        }
        let center = mesh
            .centroid()
            .ok_or_else(|| ElementError::invalid("mesh has no vertices"))?;
        let frame = Frame::world_at(center);
        Ok(Element::new(name, Geometry::Point(center), vec![Geometry::Mesh(mesh)]).with_local_frame(frame))
    }

    /// A box of the given sizes centered on `frame`.
    #[instrument(skip(frame))]
    pub fn from_box(name: &str, frame: Frame, xsize: f64, ysize: f64, zsize: f64) -> Result<Self, ElementError> {
        require_positive("xsize", xsize)?;
        require_positive("ysize", ysize)?;
        require_positive("zsize", zsize)?;
        let geometry = Geometry::Box {
            frame,
            xsize,
            ysize,
            zsize,
        };
        Ok(Element::new(name, Geometry::Point(frame.point), vec![geometry])
            .with_local_frame(frame)
            .with_global_frame(frame))
    }

    /// A beam whose centerline starts at `frame.point` and runs `length`
    /// along the frame's x-axis; the cross-section spans `width` along y and
    /// `height` along z.
    #[instrument(skip(frame))]
    pub fn from_beam(frame: Frame, length: f64, width: f64, height: f64) -> Result<Self, ElementError> {
        require_positive("length", length)?;
        require_positive("width", width)?;
        require_positive("height", height)?;
        let start = frame.point;
        let end = start + frame.xaxis * length;
        let centerline = Line::new(start, end);
        let box_frame = Frame { point: centerline.midpoint(), ..frame };
        let mesh = Mesh::from_box(&box_frame, length, width, height);
        debug!(length, width, height, "beam built");
        Ok(Element::new(names::BEAM, Geometry::Line(centerline), vec![Geometry::Mesh(mesh)])
            .with_local_frame(frame)
            .with_global_frame(frame))
    }

    /// A plate lofted between two outlines of equal length.
    ///
    /// The simplified geometry is the first outline; the local frame lies in
    /// its plane, anchored at its first vertex.
    #[instrument(skip_all, fields(points = outline_a.len()))]
    pub fn from_plate(outline_a: Vec<Point3d>, outline_b: Vec<Point3d>) -> Result<Self, ElementError> {
        if outline_a.len() != outline_b.len() {
            return Err(ElementError::invalid(format!(
                "plate outlines differ in length: {} vs {}",
                outline_a.len(),
                outline_b.len()
            )));
        }
        let mesh = Mesh::loft(&outline_a, &outline_b)
            .ok_or_else(|| ElementError::invalid("plate outline needs at least three points"))?;
        let plane = Polygon::new(outline_a.clone())
            .plane()
            .ok_or_else(|| ElementError::invalid("plate outline is degenerate"))?;
        let frame = Frame {
            point: outline_a[0],
            ..Frame::from_plane(&plane)
        };
        Ok(Element::new(names::PLATE, Geometry::Polyline(Polyline::new(outline_a)), vec![Geometry::Mesh(mesh)])
            .with_local_frame(frame)
            .with_global_frame(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_geometry::Vec3;

    #[test]
    fn test_from_mesh_centers_on_centroid() {
        let mesh = Mesh::from_box(&Frame::world_at(Point3d::new(2.0, 0.0, 0.0)), 1.0, 1.0, 1.0);
        let e = Element::from_mesh(names::BLOCK, mesh).unwrap();
        assert!(e.center().approx_eq(&Point3d::new(2.0, 0.0, 0.0), 1e-12));
        assert_eq!(e.meshes().len(), 1);
        assert!(Element::from_mesh(names::BLOCK, Mesh::empty()).is_err());
    }

    #[test]
    fn test_from_box_rejects_non_positive_sizes() {
        assert!(Element::from_box(names::BLOCK, Frame::world(), 1.0, 0.0, 1.0).is_err());
        assert!(Element::from_box(names::BLOCK, Frame::world(), 1.0, 1.0, f64::NAN).is_err());
        let e = Element::from_box(names::BLOCK, Frame::world(), 1.0, 2.0, 3.0).unwrap();
        approx::assert_abs_diff_eq!(e.aabb(0.0).volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beam_centerline_and_box() {
        let frame = Frame::new(Point3d::new(0.0, 0.0, 1.0), Vec3::Y, -Vec3::X);
        let beam = Element::from_beam(frame, 4.0, 0.2, 0.3).unwrap();
        assert_eq!(beam.name, names::BEAM);
        assert!(beam.center().approx_eq(&Point3d::new(0.0, 2.0, 1.0), 1e-12));
        let bb = beam.aabb(0.0);
        approx::assert_abs_diff_eq!(bb.size().y, 4.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(bb.size().x, 0.2, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(bb.size().z, 0.3, epsilon = 1e-12);
        assert!(Element::from_beam(frame, -1.0, 0.2, 0.3).is_err());
    }

    #[test]
    fn test_plate_from_outlines() {
        let a = vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ];
        let b: Vec<Point3d> = a.iter().map(|p| Point3d::new(p.x, p.y, 0.1)).collect();
        let plate = Element::from_plate(a.clone(), b.clone()).unwrap();
        assert_eq!(plate.name, names::PLATE);
        assert_eq!(plate.local_frame().point, a[0]);
        assert!((plate.local_frame().zaxis() - Vec3::Z).length() < 1e-12);
        approx::assert_abs_diff_eq!(plate.meshes()[0].signed_volume(), 0.2, epsilon = 1e-12);
        assert!(Element::from_plate(a, b[..3].to_vec()).is_err());
    }
}

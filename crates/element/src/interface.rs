//! Contact interfaces between two elements.

use assembly_geometry::{Frame, Point3d, Polygon, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Force sample at one point of an interface, in the interface frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfaceForce {
    pub point: Point3d,
    pub normal_component: f64,
    pub tangent_u: f64,
    pub tangent_v: f64,
}

/// A planar contact between two elements.
///
/// The frame sits on the polygon centroid; its z-axis is the outward normal
/// of the first element's face, so it points from the first element towards
/// the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub polygon: Polygon,
    pub frame: Frame,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forces: Option<Vec<InterfaceForce>>,
}

impl Interface {
    /// Build from a polygon and the contact normal; area is measured from
    /// the polygon.
    pub fn new(polygon: Polygon, normal: Vec3) -> Self {
        let origin = polygon.centroid().unwrap_or(Point3d::ORIGIN);
        let frame = Frame::from_point_normal(origin, normal);
        let area = polygon.area();
        Self {
            polygon,
            frame,
            area,
            forces: None,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.frame.zaxis()
    }

    pub fn centroid(&self) -> Point3d {
        self.frame.point
    }

    pub fn with_forces(mut self, forces: Vec<InterfaceForce>) -> Self {
        self.forces = Some(forces);
        self
    }

    /// Sum of normal force components, `None` when no forces are attached.
    pub fn total_normal_force(&self) -> Option<f64> {
        self.forces
            .as_ref()
            .map(|fs| fs.iter().map(|f| f.normal_component).sum())
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        let polygon = self.polygon.transformed(t);
        let area = polygon.area();
        Self {
            polygon,
            frame: self.frame.transformed(t),
            area,
            forces: self.forces.as_ref().map(|fs| {
                fs.iter()
                    .map(|f| InterfaceForce {
                        point: t.transform_point(&f.point),
                        ..*f
                    })
                    .collect()
            }),
        }
    }
}

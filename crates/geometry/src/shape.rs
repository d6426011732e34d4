//! Tagged geometry variants carried by elements.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::frame::Frame;
use crate::mesh::Mesh;
use crate::plane::Line;
use crate::point::{self, Point3d};
use crate::polygon::Polygon;
use crate::transform::Transform;

/// An open chain of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3d>,
}

impl Polyline {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }
}

/// Every geometry an element can hold, either as its simplified
/// representative or as one of its full representations.
///
/// Serialized with an internal `"type"` tag; an unrecognised tag fails to
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point(Point3d),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Mesh(Mesh),
    /// Box of the given sizes centered on `frame`.
    Box {
        frame: Frame,
        xsize: f64,
        ysize: f64,
        zsize: f64,
    },
    PointCloud {
        points: Vec<Point3d>,
    },
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Mesh(_) => "Mesh",
            Geometry::Box { .. } => "Box",
            Geometry::PointCloud { .. } => "PointCloud",
        }
    }

    /// Apply `t` in place.
    ///
    /// A box keeps its box form: the frame is transformed and each size is
    /// scaled by how much `t` stretches the matching axis.
    pub fn transform(&mut self, t: &Transform) {
        match self {
            Geometry::Point(p) => *p = t.transform_point(p),
            Geometry::Line(l) => {
                l.start = t.transform_point(&l.start);
                l.end = t.transform_point(&l.end);
            }
            Geometry::Polyline(pl) => {
                for p in &mut pl.points {
                    *p = t.transform_point(p);
                }
            }
            Geometry::Polygon(pg) => *pg = pg.transformed(t),
            Geometry::Mesh(m) => m.transform(t),
            Geometry::Box {
                frame,
                xsize,
                ysize,
                zsize,
            } => {
                *xsize *= t.transform_vector(&frame.xaxis).length();
                *ysize *= t.transform_vector(&frame.yaxis).length();
                *zsize *= t.transform_vector(&frame.zaxis()).length();
                *frame = frame.transformed(t);
            }
            Geometry::PointCloud { points } => {
                for p in points {
                    *p = t.transform_point(p);
                }
            }
        }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        let mut out = self.clone();
        out.transform(t);
        out
    }

    /// Representative points: vertices for point sets, the eight corners for
    /// a box.
    pub fn sample_points(&self) -> Vec<Point3d> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Line(l) => vec![l.start, l.end],
            Geometry::Polyline(pl) => pl.points.clone(),
            Geometry::Polygon(pg) => pg.points.clone(),
            Geometry::Mesh(m) => m.vertices.clone(),
            Geometry::Box { .. } => self.to_mesh().map(|m| m.vertices).unwrap_or_default(),
            Geometry::PointCloud { points } => points.clone(),
        }
    }

    pub fn aabb(&self) -> BoundingBox {
        BoundingBox::from_points(&self.sample_points())
    }

    /// Where an element built on this geometry anchors its frames.
    pub fn natural_origin(&self) -> Option<Point3d> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Line(l) => Some(l.start),
            Geometry::Polyline(pl) => pl.points.first().copied(),
            Geometry::Box { frame, .. } => Some(frame.point),
            _ => self.centroid(),
        }
    }

    /// Mean of the sample points.
    pub fn centroid(&self) -> Option<Point3d> {
        point::centroid(&self.sample_points())
    }

    /// Closed polygonal mesh, for the variants that have faces.
    pub fn to_mesh(&self) -> Option<Mesh> {
        match self {
            Geometry::Mesh(m) => Some(m.clone()),
            Geometry::Box {
                frame,
                xsize,
                ysize,
                zsize,
            } => Some(Mesh::from_box(frame, *xsize, *ysize, *zsize)),
            _ => None,
        }
    }
}

impl From<Point3d> for Geometry {
    fn from(p: Point3d) -> Self {
        Geometry::Point(p)
    }
}

impl From<Line> for Geometry {
    fn from(l: Line) -> Self {
        Geometry::Line(l)
    }
}

impl From<Polyline> for Geometry {
    fn from(pl: Polyline) -> Self {
        Geometry::Polyline(pl)
    }
}

impl From<Mesh> for Geometry {
    fn from(m: Mesh) -> Self {
        Geometry::Mesh(m)
    }
}

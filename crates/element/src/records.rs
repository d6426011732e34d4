//! Side records attached to elements (fabrication and structural data).
//!
//! The model never interprets these; they travel with the element and
//! round-trip through persistence.

use std::collections::BTreeMap;

use assembly_geometry::{Frame, Polyline, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SideRecord {
    /// A placement, e.g. a nesting frame on a sheet.
    Frame { frame: Frame },
    /// Toolpaths, outlines and other point chains.
    Polylines { polylines: Vec<Polyline> },
    /// A single vector quantity, e.g. a node force.
    Vector { vector: Vec3 },
    Scalars { values: Vec<f64> },
    Json { value: serde_json::Value },
}

pub type SideRecords = BTreeMap<String, SideRecord>;

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_geometry::Point3d;

    #[test]
    fn test_records_are_tagged() {
        let mut records = SideRecords::new();
        records.insert(
            "nesting".into(),
            SideRecord::Frame {
                frame: Frame::world_at(Point3d::new(1.0, 0.0, 0.0)),
            },
        );
        records.insert(
            "load".into(),
            SideRecord::Vector {
                vector: Vec3::new(0.0, 0.0, -9.81),
            },
        );
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json["nesting"]["type"], "Frame");
        assert_eq!(json["load"]["type"], "Vector");
        let back: SideRecords = serde_json::from_value(json).unwrap();
        assert_eq!(back, records);
    }
}

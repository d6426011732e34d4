//! Reference assemblies used by the scenario tests.

use assembly_element::Element;
use assembly_geometry::{Frame, Mesh, Point3d};
use tracing::debug;

use crate::helpers::HarnessError;

/// Shape of a single-span segmental arch.
///
/// The arch spans along x, rises along z and is `depth` thick along y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchParams {
    pub rise: f64,
    pub span: f64,
    pub depth: f64,
    pub thickness: f64,
    /// Number of voussoirs.
    pub n: usize,
}

impl Default for ArchParams {
    fn default() -> Self {
        Self {
            rise: 1.0,
            span: 20.0,
            depth: 10.0,
            thickness: 0.5,
            n: 5,
        }
    }
}

impl ArchParams {
    /// Radius of the circle through both springings and the crown.
    pub fn radius(&self) -> f64 {
        let half = self.span / 2.0;
        (self.rise * self.rise + half * half) / (2.0 * self.rise)
    }

    fn validate(&self) -> Result<(), HarnessError> {
        for (name, value) in [
            ("rise", self.rise),
            ("span", self.span),
            ("depth", self.depth),
            ("thickness", self.thickness),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(HarnessError::Fixture {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if self.n == 0 {
            return Err(HarnessError::Fixture {
                reason: "an arch needs at least one voussoir".into(),
            });
        }
        if self.rise > self.span / 2.0 {
            return Err(HarnessError::Fixture {
                reason: format!("rise {} exceeds half the span", self.rise),
            });
        }
        if self.thickness >= self.radius() {
            return Err(HarnessError::Fixture {
                reason: format!("thickness {} reaches the arch center", self.thickness),
            });
        }
        Ok(())
    }
}

/// Mesh voussoirs along a circular arc, ordered from one springing to the
/// other. Neighbouring blocks share their joint faces exactly; block `i`
/// carries index path `[i]`.
pub fn arch_blocks(params: &ArchParams) -> Result<Vec<Element>, HarnessError> {
    params.validate()?;
    let radius = params.radius();
    let center_z = params.rise - radius;
    let half_angle = (params.span / 2.0 / radius).asin();
    let inner = radius - params.thickness / 2.0;
    let outer = radius + params.thickness / 2.0;
    let half_depth = params.depth / 2.0;

    // Joint angles measured from the vertical; shared by both blocks at a joint.
    let joints: Vec<f64> = (0..=params.n)
        .map(|i| -half_angle + 2.0 * half_angle * i as f64 / params.n as f64)
        .collect();
    let on_arc = |r: f64, angle: f64, y: f64| Point3d::new(r * angle.sin(), y, center_z + r * angle.cos());

    let mut blocks = Vec::with_capacity(params.n);
    for (i, w) in joints.windows(2).enumerate() {
        let ring = |y: f64| {
            vec![
                on_arc(inner, w[0], y),
                on_arc(outer, w[0], y),
                on_arc(outer, w[1], y),
                on_arc(inner, w[1], y),
            ]
        };
        let mesh = Mesh::loft(&ring(-half_depth), &ring(half_depth)).ok_or_else(|| HarnessError::Fixture {
            reason: format!("voussoir {i} could not be lofted"),
        })?;
        blocks.push(Element::from_mesh("BLOCK", mesh)?.with_index_path(vec![i as i64]));
    }
    debug!(n = blocks.len(), radius, "built arch voussoirs");
    Ok(blocks)
}

/// `nx` by `ny` cubes of edge `size` resting face to face in the XY plane.
/// Cube `(i, j)` is centered at `(i * size, j * size, 0)`, comes at position
/// `j * nx + i` and carries index path `[i, j]`.
pub fn cube_grid(nx: usize, ny: usize, size: f64) -> Result<Vec<Element>, HarnessError> {
    if !(size.is_finite() && size > 0.0) {
        return Err(HarnessError::Fixture {
            reason: format!("cube size must be positive, got {size}"),
        });
    }
    let mut cubes = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let frame = Frame::world_at(Point3d::new(i as f64 * size, j as f64 * size, 0.0));
            let cube = Element::from_box("BLOCK", frame, size, size, size)?;
            cubes.push(cube.with_index_path(vec![i as i64, j as i64]));
        }
    }
    Ok(cubes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arch_radius() {
        approx::assert_relative_eq!(ArchParams::default().radius(), 50.5);
    }

    #[test]
    fn arch_is_symmetric_about_the_crown() {
        let blocks = arch_blocks(&ArchParams::default()).unwrap();
        assert_eq!(blocks.len(), 5);
        let first = blocks[0].center();
        let last = blocks[4].center();
        approx::assert_abs_diff_eq!(first.x, -last.x, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(first.z, last.z, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(blocks[2].center().x, 0.0, epsilon = 1e-9);
        assert!(blocks[2].center().z > first.z);
    }

    #[test]
    fn arch_spans_the_requested_width() {
        let blocks = arch_blocks(&ArchParams::default()).unwrap();
        let bb = blocks
            .iter()
            .map(|b| b.aabb(0.0))
            .reduce(|a, b| a.union(&b))
            .unwrap();
        let size = bb.size();
        approx::assert_abs_diff_eq!(size.y, 10.0, epsilon = 1e-9);
        // The intrados and extrados widen the footprint slightly past the span.
        assert!(size.x > 20.0 && size.x < 20.5);
    }

    #[test]
    fn bad_arch_parameters_are_rejected() {
        let flat = ArchParams {
            rise: 0.0,
            ..ArchParams::default()
        };
        assert!(matches!(arch_blocks(&flat), Err(HarnessError::Fixture { .. })));
        let empty = ArchParams {
            n: 0,
            ..ArchParams::default()
        };
        assert!(matches!(arch_blocks(&empty), Err(HarnessError::Fixture { .. })));
    }

    #[test]
    fn cube_grid_positions_are_row_major() {
        let cubes = cube_grid(2, 2, 1.0).unwrap();
        let centers: Vec<(f64, f64)> = cubes.iter().map(|c| (c.center().x, c.center().y)).collect();
        assert_eq!(centers, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(cubes[1].index_path, vec![1, 0]);
        assert!(cube_grid(2, 2, -1.0).is_err());
    }
}

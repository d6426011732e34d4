//! Structured text-based model reports.
//!
//! Reports are plain text rather than JSON so a failing scenario can print
//! the whole model in a form that reads top to bottom.

use std::collections::BTreeMap;
use std::fmt;

use assembly_geometry::BoundingBox;
use assembly_model::Model;

use crate::oracle::{OracleVerdict, run_consistency_checks};

/// A complete model report with all sections.
pub struct ModelReport {
    pub tree_outline: String,
    pub group_count: usize,
    pub leaf_count: usize,
    pub element_count: usize,
    /// Registered elements per element name.
    pub element_names: BTreeMap<String, usize>,
    pub edge_count: usize,
    pub interface_count: usize,
    pub total_interface_area: f64,
    pub bounding_box: Option<BoundingBox>,
    pub oracle_results: Vec<OracleVerdict>,
}

impl ModelReport {
    /// Summarize a model and run the structural oracles on it.
    pub fn from_model(model: &Model) -> Self {
        let tree = model.tree();
        let mut element_names = BTreeMap::new();
        let mut bounds: Option<BoundingBox> = None;
        for e in model.elements() {
            *element_names.entry(e.name.clone()).or_insert(0) += 1;
            let bb = e.aabb(0.0);
            if !bb.is_empty() {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&bb),
                    None => bb,
                });
            }
        }

        let edges = model.get_interactions();
        let mut interface_count = 0;
        let mut total_interface_area = 0.0;
        for &(a, b) in &edges {
            for iface in model.interfaces_of(a, b) {
                interface_count += 1;
                total_interface_area += iface.area;
            }
        }

        Self {
            tree_outline: model.tree_string(),
            group_count: tree.groups().len(),
            leaf_count: tree.leaves().len(),
            element_count: model.element_count(),
            element_names,
            edge_count: edges.len(),
            interface_count,
            total_interface_area,
            bounding_box: bounds,
            oracle_results: run_consistency_checks(model),
        }
    }

    /// Append the verdicts of extra oracles.
    pub fn with_verdicts(mut self, verdicts: impl IntoIterator<Item = OracleVerdict>) -> Self {
        self.oracle_results.extend(verdicts);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Assembly Model Report ===\n\n");

        out.push_str(&format!(
            "Tree ({} groups, {} leaves):\n",
            self.group_count, self.leaf_count,
        ));
        for line in self.tree_outline.lines() {
            out.push_str(&format!("  {line}\n"));
        }

        out.push_str(&format!("\nElements ({} registered):\n", self.element_count));
        for (name, count) in &self.element_names {
            out.push_str(&format!("  {name} x{count}\n"));
        }

        out.push_str(&format!(
            "\nInteractions: {} edges, {} interfaces, total area {:.3}\n",
            self.edge_count, self.interface_count, self.total_interface_area,
        ));

        if let Some(bb) = &self.bounding_box {
            out.push_str(&format!(
                "\nBounding Box: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
                bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z,
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!("\nOracle Results ({} checks):\n", self.oracle_results.len()));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        out
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

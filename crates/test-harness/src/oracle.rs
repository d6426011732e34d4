//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use assembly_element::ElementId;
use assembly_file_format::{ProjectMetadata, load_project, save_project};
use assembly_model::Model;

use crate::helpers::HarnessError;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }

    /// Turn a failed verdict into an error.
    pub fn into_result(self) -> Result<(), HarnessError> {
        if self.passed {
            Ok(())
        } else {
            Err(HarnessError::OracleFailure {
                oracle: self.oracle_name,
                detail: self.detail,
            })
        }
    }
}

// ── Structure Oracles ───────────────────────────────────────────────────────

/// Every tree leaf names a registered element.
pub fn check_leaves_registered(model: &Model) -> OracleVerdict {
    let leaves = model.tree().leaves();
    let dangling: Vec<ElementId> = leaves
        .iter()
        .map(|&(_, id)| id)
        .filter(|&id| !model.contains_element(id))
        .collect();
    if dangling.is_empty() {
        OracleVerdict::pass("leaves_registered", format!("{} leaves, all registered", leaves.len()))
    } else {
        OracleVerdict::fail(
            "leaves_registered",
            format!("{} of {} leaves dangle, first {}", dangling.len(), leaves.len(), dangling[0]),
        )
    }
}

/// The graph's vertex set equals the registry.
pub fn check_graph_vertices(model: &Model) -> OracleVerdict {
    let registered: BTreeSet<ElementId> = model.elements().map(|e| e.id()).collect();
    let vertices = model.graph().vertices();
    if vertices == registered {
        OracleVerdict::pass("graph_vertices", format!("{} vertices match the registry", vertices.len()))
    } else {
        let missing = registered.difference(&vertices).count();
        let extra = vertices.difference(&registered).count();
        OracleVerdict::fail(
            "graph_vertices",
            format!("{missing} registered elements without a vertex, {extra} vertices without an element"),
        )
    }
}

/// Every edge is stored smaller identity first and joins two distinct
/// registered elements.
pub fn check_edge_keys(model: &Model) -> OracleVerdict {
    let edges = model.get_interactions();
    for &(a, b) in &edges {
        if a >= b {
            return OracleVerdict::fail("edge_keys", format!("edge ({a}, {b}) is not ordered"));
        }
        if !model.contains_element(a) || !model.contains_element(b) {
            return OracleVerdict::fail("edge_keys", format!("edge ({a}, {b}) has an unregistered endpoint"));
        }
    }
    OracleVerdict::pass("edge_keys", format!("{} edges well formed", edges.len()))
}

/// No two comparable neighbouring siblings are out of order.
pub fn check_sibling_order(model: &Model) -> OracleVerdict {
    let tree = model.tree();
    for group in tree.groups() {
        for pair in tree.children(group).windows(2) {
            let (Some(a), Some(b)) = (tree.node(pair[0]), tree.node(pair[1])) else {
                continue;
            };
            if a.sort_cmp(b) == Some(Ordering::Greater) {
                return OracleVerdict::fail(
                    "sibling_order",
                    format!("\"{}\" precedes \"{}\" under {}", a.label(), b.label(), tree.path_of(group).join("/")),
                );
            }
        }
    }
    OracleVerdict::pass("sibling_order", "siblings sorted".into())
}

// ── Interaction Oracles ─────────────────────────────────────────────────────

/// Every interface on every edge covers at least `min_area`.
pub fn check_interface_areas(model: &Model, min_area: f64) -> OracleVerdict {
    let mut total = 0.0;
    for (a, b) in model.get_interactions() {
        for iface in model.interfaces_of(a, b) {
            if iface.area < min_area {
                return OracleVerdict::fail_val(
                    "interface_areas",
                    format!("interface ({a}, {b}) area {:.6} below {min_area}", iface.area),
                    iface.area,
                );
            }
            total += iface.area;
        }
    }
    OracleVerdict::pass_val("interface_areas", format!("total contact area {total:.6}"), total)
}

/// The graph is connected over all registered elements.
pub fn check_connected(model: &Model) -> OracleVerdict {
    let ids: Vec<ElementId> = model.elements().map(|e| e.id()).collect();
    let Some(&first) = ids.first() else {
        return OracleVerdict::pass("connected", "empty model".into());
    };
    let unreachable = ids[1..]
        .iter()
        .filter(|&&id| model.find_shortest_path(first, id, false).elements.is_empty())
        .count();
    if unreachable == 0 {
        OracleVerdict::pass("connected", format!("{} elements in one component", ids.len()))
    } else {
        OracleVerdict::fail_val(
            "connected",
            format!("{unreachable} elements unreachable from the first"),
            unreachable as f64,
        )
    }
}

// ── Persistence Oracles ─────────────────────────────────────────────────────

/// Saving and loading the model keeps its tree, registry and edges.
pub fn check_save_load_round_trip(model: &Model) -> OracleVerdict {
    let json = match save_project(model, &ProjectMetadata::new("oracle")) {
        Ok(json) => json,
        Err(e) => return OracleVerdict::fail("save_load_round_trip", format!("save failed: {e}")),
    };
    let loaded = match load_project(&json) {
        Ok((loaded, _)) => loaded,
        Err(e) => return OracleVerdict::fail("save_load_round_trip", format!("load failed: {e}")),
    };
    if loaded.tree_string() != model.tree_string() {
        return OracleVerdict::fail("save_load_round_trip", "tree changed".into());
    }
    if loaded.element_count() != model.element_count() {
        return OracleVerdict::fail(
            "save_load_round_trip",
            format!("{} elements became {}", model.element_count(), loaded.element_count()),
        );
    }
    if loaded.get_interactions() != model.get_interactions() {
        return OracleVerdict::fail("save_load_round_trip", "edges changed".into());
    }
    OracleVerdict::pass_val("save_load_round_trip", format!("{} bytes", json.len()), json.len() as f64)
}

// ── Aggregate ───────────────────────────────────────────────────────────────

/// The structural oracles every model must pass.
pub fn run_consistency_checks(model: &Model) -> Vec<OracleVerdict> {
    vec![
        check_leaves_registered(model),
        check_graph_vertices(model),
        check_edge_keys(model),
        check_sibling_order(model),
    ]
}

/// Fail on the first structural oracle that does not pass.
pub fn check_model_consistency(model: &Model) -> Result<(), HarnessError> {
    run_consistency_checks(model)
        .into_iter()
        .try_for_each(OracleVerdict::into_result)
}

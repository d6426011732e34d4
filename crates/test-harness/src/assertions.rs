//! Assertion helpers with diagnostic output.
//!
//! Expectations are written as indices into the fixture's identity list, so
//! failures read as `(0, 1)` rather than as pairs of UUIDs. Every failure
//! carries the caller's context string and the model outline.

use std::collections::BTreeSet;

use assembly_element::ElementId;
use assembly_model::Model;

use crate::helpers::{HarnessError, edges_as_indices, index_of, path_as_indices};

fn failure(ctx: &str, model: &Model, message: String) -> HarnessError {
    HarnessError::AssertionFailed {
        detail: format!("[{ctx}] {message}\n{}", model.tree_string()),
    }
}

/// Assert the model's edge set, as fixture indices.
pub fn assert_edges_eq(
    model: &Model,
    ids: &[ElementId],
    expected: &[(usize, usize)],
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = edges_as_indices(model, ids)?;
    let expected: BTreeSet<(usize, usize)> = expected.iter().map(|&(i, j)| (i.min(j), i.max(j))).collect();
    if actual == expected {
        Ok(())
    } else {
        Err(failure(ctx, model, format!("expected edges {expected:?}, got {actual:?}")))
    }
}

/// Assert the shortest path between two fixture elements.
pub fn assert_path_eq(
    model: &Model,
    ids: &[ElementId],
    from: usize,
    to: usize,
    expected: &[usize],
    ctx: &str,
) -> Result<(), HarnessError> {
    let (Some(&src), Some(&dst)) = (ids.get(from), ids.get(to)) else {
        return Err(failure(ctx, model, format!("path endpoints {from}, {to} outside the fixture")));
    };
    let path = model.find_shortest_path(src, dst, false);
    let actual = path_as_indices(&path.elements, ids)?;
    if actual == expected {
        Ok(())
    } else {
        Err(failure(ctx, model, format!("expected path {expected:?}, got {actual:?}")))
    }
}

/// Assert that the primary interface on an edge has the given area.
pub fn assert_interface_area(
    model: &Model,
    ids: &[ElementId],
    edge: (usize, usize),
    expected: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (Some(&a), Some(&b)) = (ids.get(edge.0), ids.get(edge.1)) else {
        return Err(failure(ctx, model, format!("edge {edge:?} outside the fixture")));
    };
    let area = model
        .interaction(a, b)
        .and_then(|i| i.interface.as_ref())
        .map(|iface| iface.area)
        .ok_or_else(|| failure(ctx, model, format!("edge {edge:?} carries no interface")))?;
    if (area - expected).abs() <= tol {
        Ok(())
    } else {
        Err(failure(
            ctx,
            model,
            format!("edge {edge:?} area: expected {expected:.6}, got {area:.6} (tol={tol})"),
        ))
    }
}

/// Assert the direct children of a group, in order, as fixture indices.
pub fn assert_group_holds(
    model: &Model,
    path: &[&str],
    ids: &[ElementId],
    expected: &[usize],
    ctx: &str,
) -> Result<(), HarnessError> {
    let group = model
        .find_group(path)
        .ok_or_else(|| failure(ctx, model, format!("no group at {}", path.join("/"))))?;
    let actual = model
        .tree()
        .children(group)
        .iter()
        .filter_map(|&c| model.tree().node(c)?.element())
        .map(|id| index_of(ids, id))
        .collect::<Result<Vec<_>, _>>()?;
    if actual == expected {
        Ok(())
    } else {
        Err(failure(
            ctx,
            model,
            format!("{} holds {actual:?}, expected {expected:?}", path.join("/")),
        ))
    }
}

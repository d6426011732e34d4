//! Helper functions: error type and conversions between element identities
//! and fixture indices.

use std::collections::BTreeSet;

use assembly_element::{ElementError, ElementId};
use assembly_model::{Model, ModelError};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("bad fixture parameters: {reason}")]
    Fixture { reason: String },

    #[error("element {id} is not part of the fixture")]
    UnknownElement { id: ElementId },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Element(#[from] ElementError),
}

// ── Index Conversions ───────────────────────────────────────────────────────

/// Position of `id` in the fixture's identity list.
pub fn index_of(ids: &[ElementId], id: ElementId) -> Result<usize, HarnessError> {
    ids.iter()
        .position(|&x| x == id)
        .ok_or(HarnessError::UnknownElement { id })
}

/// The model's edges as index pairs into `ids`, smaller index first.
pub fn edges_as_indices(model: &Model, ids: &[ElementId]) -> Result<BTreeSet<(usize, usize)>, HarnessError> {
    model
        .get_interactions()
        .into_iter()
        .map(|(a, b)| {
            let (i, j) = (index_of(ids, a)?, index_of(ids, b)?);
            Ok((i.min(j), i.max(j)))
        })
        .collect()
}

/// A path of identities as indices into `ids`.
pub fn path_as_indices(path: &[ElementId], ids: &[ElementId]) -> Result<Vec<usize>, HarnessError> {
    path.iter().map(|&id| index_of(ids, id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_reports_strangers() {
        let ids = [ElementId::from_u128(1), ElementId::from_u128(2)];
        assert_eq!(index_of(&ids, ids[1]).unwrap(), 1);
        let stranger = ElementId::from_u128(9);
        assert!(matches!(
            index_of(&ids, stranger),
            Err(HarnessError::UnknownElement { id }) if id == stranger
        ));
    }

    #[test]
    fn path_conversion_keeps_order() {
        let ids: Vec<ElementId> = (0..4).map(ElementId::from_u128).collect();
        let path = [ids[3], ids[1], ids[0]];
        assert_eq!(path_as_indices(&path, &ids).unwrap(), vec![3, 1, 0]);
    }
}

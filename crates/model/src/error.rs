use assembly_element::{ElementError, ElementId};
use thiserror::Error;

use crate::tree::NodeId;

/// Errors surfaced by model mutators, tree operations and the document loader.
///
/// A mutator that returns an error leaves the model unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown element: {id}")]
    UnknownElement { id: ElementId },

    #[error("duplicate sibling name: {name}")]
    DuplicateName { name: String },

    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("malformed document: {reason}")]
    Malformed { reason: String },

    #[error("index {index} out of range (node has {len} children)")]
    OutOfRange { index: usize, len: usize },

    #[error("reparenting {node:?} would create a cycle")]
    CycleAttempt { node: NodeId },

    #[error("unknown tree node {node:?}")]
    UnknownNode { node: NodeId },

    #[error("tree node {node:?} is a leaf and cannot hold children")]
    NotAGroup { node: NodeId },

    #[error("no child matches {key}")]
    MissingChild { key: String },

    #[error("element {id} cannot interact with itself")]
    SelfInteraction { id: ElementId },
}

impl ModelError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ModelError::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<ElementError> for ModelError {
    fn from(err: ElementError) -> Self {
        match err {
            ElementError::InvalidGeometry { reason } => ModelError::InvalidGeometry { reason },
        }
    }
}

pub mod algebra;
pub mod discovery;
pub mod document;
pub mod error;
pub mod graph;
pub mod model;
pub mod registry;
pub mod tree;

pub use discovery::{DiscoveryConfig, DiscoveryMode, DiscoveryReport, candidate_pairs};
pub use document::{EdgeDocument, GraphDocument, ModelDocument, NodeDocument};
pub use error::ModelError;
pub use graph::{Interaction, InteractionGraph};
pub use model::{Model, PathGeometry, Replacement, ShortestPath, ROOT_NAME};
pub use registry::Registry;
pub use tree::{Attributes, ChildKey, ElementTree, NodeId, NodeKind, NodeName, TreeNode, TreeOptions};

use assembly_model::{Model, ModelDocument};
use serde::Serialize;
use tracing::debug;

use crate::metadata::ProjectMetadata;

/// Format identifier written to every file.
pub const FORMAT_ID: &str = "discrete-assembly";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyFile {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    pub project: ProjectMetadata,
    /// Tree, registry and interaction graph.
    pub model: ModelDocument,
}

/// Serialize a model and its metadata to pretty-printed JSON.
pub fn save_project(model: &Model, metadata: &ProjectMetadata) -> serde_json::Result<String> {
    let file = AssemblyFile {
        format: FORMAT_ID.to_string(),
        version: FORMAT_VERSION,
        project: metadata.clone(),
        model: model.to_document(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    debug!(bytes = json.len(), elements = model.element_count(), "saved project");
    Ok(json)
}

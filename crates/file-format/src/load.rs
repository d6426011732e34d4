use assembly_model::Model;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::migrate::migrate;
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level file structure for deserialization. The model stays raw
/// JSON until it has been migrated.
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyFileRaw {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub model: serde_json::Value,
}

/// Deserialize a project from a JSON string.
///
/// Checks the format identifier and version, migrates older files, then
/// rebuilds and validates the model.
pub fn load_project(json: &str) -> Result<(Model, ProjectMetadata), LoadError> {
    let raw: AssemblyFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_ID {
        warn!(format = %raw.format, "unknown file format");
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let doc = migrate(raw.model, raw.version, FORMAT_VERSION)?;
    let model = Model::from_json_value(doc)?;
    debug!(elements = model.element_count(), "loaded project");
    Ok((model, raw.project))
}

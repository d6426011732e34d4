use serde_json::Value;

use crate::errors::LoadError;

/// Bring a raw model document from `from_version` to `to_version`.
///
/// Steps run one version at a time on the untyped JSON so that old layouts
/// never need a Rust type.
pub fn migrate(model: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    (from_version..to_version).try_fold(model, |doc, version| {
        step(doc, version).map_err(|reason| LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason,
        })
    })
}

/// Migrate from `version` to `version + 1`. Version 1 is the only layout so
/// far, so there is no step yet.
fn step(_doc: Value, version: u32) -> Result<Value, String> {
    Err(format!("no migration step from v{version}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_version_is_untouched() {
        let doc = json!({ "tree": { "kind": "group", "name": "model" } });
        assert_eq!(migrate(doc.clone(), 1, 1).unwrap(), doc);
    }

    #[test]
    fn test_missing_step_fails() {
        let err = migrate(json!({}), 0, 1).unwrap_err();
        assert!(matches!(err, LoadError::MigrationFailed { from: 0, to: 1, .. }));
    }
}

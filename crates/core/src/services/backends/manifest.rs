use std::path::Path;

use crate::error::{TccError, TccResult};
use crate::services::tools::ManifestReader;

/// Reads `CFBundleIdentifier` from an `Info.plist` (XML or binary) with the `plist` crate.
pub struct PlistManifestReader;

impl ManifestReader for PlistManifestReader {
    fn bundle_identifier(&self, manifest: &Path) -> TccResult<String> {
        let value = plist::Value::from_file(manifest)?;
        value
            .as_dictionary()
            .and_then(|dict| dict.get("CFBundleIdentifier"))
            .and_then(|id| id.as_string())
            .map(str::to_string)
            .ok_or_else(|| TccError::Manifest {
                path: manifest.to_path_buf(),
                message: "missing or non-string CFBundleIdentifier".to_string(),
            })
    }
}

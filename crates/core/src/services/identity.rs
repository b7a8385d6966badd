use std::path::Path;

use crate::model::AppIdentity;
use crate::services::classify::{classify, MediaKind};
use crate::services::strip_trailing_separators;
use crate::services::tools::{ManifestReader, MediaTypeInspector};

/// Location of the bundle manifest relative to an `.app` root.
pub const MANIFEST_RELATIVE_PATH: &str = "Contents/Info.plist";

/// Resolve how `app_path` is addressed in a policy entry.
///
/// Scripts are always addressed by path. Anything else uses the bundle identifier
/// from its manifest, falling back to the path. Never fails.
pub fn resolve_identity(
    media: &dyn MediaTypeInspector,
    manifests: &dyn ManifestReader,
    app_path: &str,
) -> AppIdentity {
    let kind = classify(media, app_path).unwrap_or_else(|err| {
        log::warn!("Could not classify {app_path}: {err}");
        MediaKind::Unknown
    });
    if kind.is_script() {
        return AppIdentity::path(app_path);
    }

    let stripped = strip_trailing_separators(app_path);
    let manifest = Path::new(stripped).join(MANIFEST_RELATIVE_PATH);
    match manifests.bundle_identifier(&manifest) {
        Ok(bundle_id) => AppIdentity::bundle_id(bundle_id),
        Err(err) => {
            log::debug!("Falling back to path identity for {stripped}: {err}");
            AppIdentity::path(stripped)
        }
    }
}

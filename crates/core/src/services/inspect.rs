use serde::Serialize;

use crate::error::TccResult;
use crate::model::{AppIdentity, CodeRequirement};
use crate::services::classify::{classify, MediaKind};
use crate::services::identity::resolve_identity;
use crate::services::requirement::extract_requirement;
use crate::services::tools::Toolbox;

/// Everything the engine derives for a single path, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInspection {
    pub path: String,
    pub kind: MediaKind,
    pub identity: AppIdentity,
    pub code_requirement: CodeRequirement,
}

pub fn inspect_app(tools: &Toolbox, path: &str) -> TccResult<AppInspection> {
    let kind = classify(tools.media.as_ref(), path)?;
    let code_requirement =
        extract_requirement(tools.media.as_ref(), tools.codesign.as_ref(), path)?;
    let identity = resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), path);
    Ok(AppInspection { path: path.to_string(), kind, identity, code_requirement })
}

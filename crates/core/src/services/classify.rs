use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{TccError, TccResult};
use crate::services::strip_trailing_separators;
use crate::services::tools::MediaTypeInspector;

/// Coarse file classification derived from the media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    ScriptShell,
    ScriptPython,
    BundleOrBinary,
    Unknown,
}

impl MediaKind {
    /// Map the subtype token of a MIME type (`x-shellscript` in `text/x-shellscript`).
    pub fn from_mime_subtype(subtype: &str) -> Self {
        match subtype {
            "x-shellscript" => MediaKind::ScriptShell,
            "x-python" | "x-script.python" => MediaKind::ScriptPython,
            "directory" | "x-executable" | "x-sharedlib" | "octet-stream" => {
                MediaKind::BundleOrBinary
            }
            other if other.starts_with("x-mach-binary") => MediaKind::BundleOrBinary,
            _ => MediaKind::Unknown,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, MediaKind::ScriptShell | MediaKind::ScriptPython)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::ScriptShell => "script-shell",
            MediaKind::ScriptPython => "script-python",
            MediaKind::BundleOrBinary => "bundle-or-binary",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `path` by asking the media-type inspector.
///
/// A path that does not exist classifies as [`MediaKind::Unknown`] without error;
/// callers needing a hard failure check existence themselves.
pub fn classify(media: &dyn MediaTypeInspector, path: &str) -> TccResult<MediaKind> {
    let target = Path::new(strip_trailing_separators(path));
    if !target.exists() {
        log::debug!("{} does not exist; classifying as unknown", target.display());
        return Ok(MediaKind::Unknown);
    }

    let output = media.mime_type(target)?;
    if !output.success() {
        return Err(TccError::Tool {
            tool: "file".to_string(),
            message: format!(
                "{} for {}: {}",
                output.status_label(),
                target.display(),
                output.stderr.trim()
            ),
        });
    }

    let kind = parse_mime_output(&output.stdout);
    log::debug!("{} classified as {}", target.display(), kind);
    Ok(kind)
}

/// Parse `file --mime-type` output, with or without the leading `path: ` prefix.
pub fn parse_mime_output(stdout: &str) -> MediaKind {
    let line = stdout.lines().next().unwrap_or_default().trim();
    let mime = line.rsplit(": ").next().unwrap_or(line).trim();
    let subtype = mime
        .split_once('/')
        .map(|(_, sub)| sub.split(';').next().unwrap_or_default().trim())
        .unwrap_or_default();
    MediaKind::from_mime_subtype(subtype)
}

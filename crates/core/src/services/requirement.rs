use std::path::{Path, PathBuf};

use crate::error::{TccError, TccResult};
use crate::model::CodeRequirement;
use crate::services::classify::classify;
use crate::services::shebang::resolve_interpreter;
use crate::services::strip_trailing_separators;
use crate::services::tools::{CodeSignInspector, MediaTypeInspector, ToolOutput};

/// Marker preceding the designated requirement in `codesign -dr -` output.
pub const DESIGNATED_MARKER: &str = "designated =>";

/// Extract the designated requirement for `path`.
///
/// Scripts are resolved to their interpreter first, since the interpreter is the
/// binary the OS actually verifies.
pub fn extract_requirement(
    media: &dyn MediaTypeInspector,
    codesign: &dyn CodeSignInspector,
    path: &str,
) -> TccResult<CodeRequirement> {
    let stripped = strip_trailing_separators(path);
    let target = Path::new(stripped);
    if !target.exists() {
        return Err(TccError::MissingPath(target.to_path_buf()));
    }

    let signable = signable_target(media, stripped)?;
    let output = codesign.display_requirements(&signable)?;
    interpret_codesign_output(&signable, &output)
}

/// The path whose signature stands for `path`: its interpreter for scripts, else itself.
fn signable_target(media: &dyn MediaTypeInspector, path: &str) -> TccResult<PathBuf> {
    let target = PathBuf::from(path);
    if classify(media, path)?.is_script() {
        match resolve_interpreter(&target)? {
            Some(interpreter) => {
                log::debug!("{} runs under {}", target.display(), interpreter.display());
                return Ok(interpreter);
            }
            None => log::debug!("{} has no shebang; checking the script itself", path),
        }
    }
    Ok(target)
}

/// Turn one `codesign -dr -` run into a requirement or a classified error.
pub fn interpret_codesign_output(path: &Path, output: &ToolOutput) -> TccResult<CodeRequirement> {
    if output.success() {
        return parse_designated_requirement(&output.stdout)
            .or_else(|| parse_designated_requirement(&output.stderr))
            .ok_or_else(|| TccError::MissingRequirement { path: path.to_path_buf() });
    }

    if output.stderr.contains("not signed") || output.stdout.contains("not signed") {
        return Err(TccError::NotSigned(path.to_path_buf()));
    }

    Err(TccError::Tool {
        tool: "codesign".to_string(),
        message: format!(
            "{} for {}: {}",
            output.status_label(),
            path.display(),
            output.stderr.trim()
        ),
    })
}

/// Find the first line carrying [`DESIGNATED_MARKER`] and return what follows it.
pub fn parse_designated_requirement(text: &str) -> Option<CodeRequirement> {
    text.lines().find_map(|line| {
        line.split_once(DESIGNATED_MARKER).and_then(|(_, rest)| CodeRequirement::new(rest))
    })
}

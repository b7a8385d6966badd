//! Implementations of the capability traits that shell out to macOS utilities.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use crate::error::{TccError, TccResult};
use crate::services::tools::ToolOutput;

pub mod codesign;
pub mod file;
pub mod manifest;
pub mod security;

pub use codesign::CodesignCommand;
pub use file::FileCommand;
pub use manifest::PlistManifestReader;
pub use security::SecurityCmsSigner;

/// Run `bin` with `args`, capturing stdout/stderr. A non-zero exit is not an error here;
/// callers interpret the status themselves.
pub(crate) fn run_tool(bin: &Path, args: &[&OsStr]) -> TccResult<ToolOutput> {
    let mut cmd = Command::new(bin);
    cmd.args(args);
    log::debug!("running {:?}", cmd);
    let output = cmd.output().map_err(|e| TccError::Tool {
        tool: bin.display().to_string(),
        message: format!("failed to spawn: {e}"),
    })?;
    let result = ToolOutput {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };
    log::debug!("{} finished with {}", bin.display(), result.status_label());
    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_tool_captures_output_and_status() {
        let args = [OsStr::new("-c"), OsStr::new("echo hi; echo oops >&2; exit 3")];
        let out = run_tool(Path::new("/bin/sh"), &args).unwrap();
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout.trim(), "hi");
        assert_eq!(out.stderr.trim(), "oops");
        assert!(!out.success());
    }

    #[test]
    fn run_tool_reports_spawn_failure() {
        let err = run_tool(Path::new("/definitely/not/a/tool"), &[OsStr::new("x")]).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"), "unexpected error: {err}");
    }
}

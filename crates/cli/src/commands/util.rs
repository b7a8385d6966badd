use anyhow::{Context, Result};
use serde::Serialize;

use tcc_core::config::ToolPaths;
use tcc_core::services::tools::Toolbox;

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {what} to JSON"))?;
    println!("{}", serialized);
    Ok(())
}

/// Tool paths from the environment, logged so `--verbose` shows what will run.
pub fn tool_paths_from_env() -> ToolPaths {
    let paths = ToolPaths::from_env();
    log::debug!(
        "Using file={} codesign={} security={}",
        paths.file.display(),
        paths.codesign.display(),
        paths.security.display()
    );
    paths
}

/// Toolbox backed by the real utilities (or their environment overrides).
pub fn system_toolbox() -> Toolbox {
    Toolbox::system(&tool_paths_from_env())
}

use anyhow::{Context, Result};

use tcc_core::services::inspect::{inspect_app, AppInspection};
use tcc_core::services::tools::Toolbox;

use crate::commands::util::{print_json, system_toolbox};

/// Inspect every path with `tools`, stopping at the first failure.
pub fn inspect_paths(tools: &Toolbox, paths: &[String]) -> Result<Vec<AppInspection>> {
    paths
        .iter()
        .map(|path| inspect_app(tools, path).with_context(|| format!("Failed to inspect {path}")))
        .collect()
}

/// Print classification, identity and designated requirement for each path.
pub fn inspect_command(paths: &[String], json: bool) -> Result<()> {
    let inspections = inspect_paths(&system_toolbox(), paths)?;

    if json {
        return print_json(&inspections, "inspections");
    }

    for (idx, inspection) in inspections.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}", inspection.path);
        println!("  Kind: {}", inspection.kind);
        println!(
            "  Identifier: {} ({})",
            inspection.identity.identifier, inspection.identity.identifier_type
        );
        println!("  Requirement: {}", inspection.code_requirement);
    }

    Ok(())
}

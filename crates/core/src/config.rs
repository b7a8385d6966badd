//! Runtime configuration: external tool locations and request files.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{TccError, TccResult};
use crate::model::ServiceKind;
use crate::profile::ProfileMetadata;

pub const FILE_BIN_ENV: &str = "TCC_FILE_BIN";
pub const CODESIGN_BIN_ENV: &str = "TCC_CODESIGN_BIN";
pub const SECURITY_BIN_ENV: &str = "TCC_SECURITY_BIN";

/// Locations of the macOS utilities the engine shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub file: PathBuf,
    pub codesign: PathBuf,
    pub security: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/usr/bin/file"),
            codesign: PathBuf::from("/usr/bin/codesign"),
            security: PathBuf::from("/usr/bin/security"),
        }
    }
}

impl ToolPaths {
    /// Defaults, overridden by `TCC_FILE_BIN`, `TCC_CODESIGN_BIN` and `TCC_SECURITY_BIN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: PathBuf| {
            lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from).unwrap_or(fallback)
        };
        Self {
            file: pick(FILE_BIN_ENV, defaults.file),
            codesign: pick(CODESIGN_BIN_ENV, defaults.codesign),
            security: pick(SECURITY_BIN_ENV, defaults.security),
        }
    }
}

/// A profile request, from CLI flags and/or a YAML/JSON request file.
///
/// ```yaml
/// description: Grants for the build agents
/// identifier: org.example.tcc
/// name: Build agents
/// organization: Example Org
/// version: 1
/// allow: true
/// services:
///   Accessibility: [/Applications/Utilities/Terminal.app]
///   AppleEvents: ["/Applications/Foo.app,/System/Applications/Mail.app"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileRequest {
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub version: Option<u32>,
    pub allow: bool,
    pub output: Option<String>,
    pub sign: Option<String>,
    pub services: BTreeMap<ServiceKind, Vec<String>>,
}

impl ProfileRequest {
    /// Layer `overrides` on top of `self`: scalar values present in `overrides` win,
    /// `allow` is set if either sets it, and app lists are appended.
    pub fn merge(mut self, overrides: ProfileRequest) -> ProfileRequest {
        self.description = overrides.description.or(self.description);
        self.identifier = overrides.identifier.or(self.identifier);
        self.name = overrides.name.or(self.name);
        self.organization = overrides.organization.or(self.organization);
        self.version = overrides.version.or(self.version);
        self.allow |= overrides.allow;
        self.output = overrides.output.or(self.output);
        self.sign = overrides.sign.or(self.sign);
        for (kind, apps) in overrides.services {
            self.services.entry(kind).or_default().extend(apps);
        }
        self
    }

    pub fn has_services(&self) -> bool {
        self.services.values().any(|apps| !apps.is_empty())
    }

    /// Check the request is complete and return its profile metadata.
    pub fn validate(&self) -> TccResult<ProfileMetadata> {
        if !self.has_services() {
            return Err(TccError::NoServices);
        }
        if self.sign.is_some() && self.output.is_none() {
            return Err(TccError::Usage("--sign requires --output".to_string()));
        }

        Ok(ProfileMetadata {
            description: required(&self.description, "--payload-description")?,
            display_name: required(&self.name, "--payload-name")?,
            identifier: required(&self.identifier, "--payload-identifier")?,
            organization: required(&self.organization, "--payload-org")?,
            version: self
                .version
                .ok_or_else(|| TccError::Usage("Missing required --payload-version".to_string()))?,
        })
    }
}

fn required(value: &Option<String>, flag: &str) -> TccResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(TccError::Usage(format!("Missing required {flag}"))),
    }
}

/// Load a request file; the format follows the extension (`.json`, `.yaml`/`.yml`).
pub fn load_profile_request(path: &Path) -> Result<ProfileRequest> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let request = match ext {
        "json" => serde_json::from_str(&body).context("Failed to parse request JSON")?,
        "yaml" | "yml" => serde_yaml::from_str(&body).context("Failed to parse request YAML")?,
        other => {
            return Err(anyhow!(
                "Unsupported request file extension '{}' (expected json, yaml or yml)",
                other
            ))
        }
    };
    Ok(request)
}

use std::path::Path;

use crate::config::ToolPaths;
use crate::error::TccResult;
use crate::services::backends::{
    CodesignCommand, FileCommand, PlistManifestReader, SecurityCmsSigner,
};

/// Captured result of one external tool invocation.
///
/// `status` is `None` when the process was terminated by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { status: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    /// Failed run with the given exit code and stderr.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self { status: Some(status), stdout: String::new(), stderr: stderr.into() }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Short description of the exit status for error messages.
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Media-type query (`file --brief --mime-type`).
pub trait MediaTypeInspector: Send + Sync {
    fn mime_type(&self, path: &Path) -> TccResult<ToolOutput>;
}

/// Code-signing inspector (`codesign -dr -`).
pub trait CodeSignInspector: Send + Sync {
    fn display_requirements(&self, path: &Path) -> TccResult<ToolOutput>;
}

/// Reader for an application's embedded `Info.plist`.
pub trait ManifestReader: Send + Sync {
    /// Return the `CFBundleIdentifier` stored in the manifest at `manifest`.
    fn bundle_identifier(&self, manifest: &Path) -> TccResult<String>;
}

/// CMS signer for a serialized profile (`security cms -S`).
pub trait ProfileSigner: Send + Sync {
    fn sign(&self, certificate: &str, input: &Path, output: &Path) -> TccResult<ToolOutput>;
}

/// The inspection capabilities payload derivation needs, bundled for passing around.
pub struct Toolbox {
    pub media: Box<dyn MediaTypeInspector>,
    pub codesign: Box<dyn CodeSignInspector>,
    pub manifests: Box<dyn ManifestReader>,
}

impl Toolbox {
    pub fn new(
        media: impl MediaTypeInspector + 'static,
        codesign: impl CodeSignInspector + 'static,
        manifests: impl ManifestReader + 'static,
    ) -> Self {
        Self {
            media: Box::new(media),
            codesign: Box::new(codesign),
            manifests: Box::new(manifests),
        }
    }

    /// Toolbox backed by the real macOS utilities at `paths`.
    pub fn system(paths: &ToolPaths) -> Self {
        Self::new(
            FileCommand::new(&paths.file),
            CodesignCommand::new(&paths.codesign),
            PlistManifestReader,
        )
    }
}

/// Signer backed by `security cms` at the configured path.
pub fn system_signer(paths: &ToolPaths) -> SecurityCmsSigner {
    SecurityCmsSigner::new(&paths.security)
}

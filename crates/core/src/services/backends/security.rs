use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::TccResult;
use crate::services::backends::run_tool;
use crate::services::tools::{ProfileSigner, ToolOutput};

/// `security cms -S -N <certificate> -i <input> -o <output>`.
pub struct SecurityCmsSigner {
    bin: PathBuf,
}

impl SecurityCmsSigner {
    pub fn new(bin: impl AsRef<Path>) -> Self {
        Self { bin: bin.as_ref().to_path_buf() }
    }
}

impl ProfileSigner for SecurityCmsSigner {
    fn sign(&self, certificate: &str, input: &Path, output: &Path) -> TccResult<ToolOutput> {
        run_tool(
            &self.bin,
            &[
                OsStr::new("cms"),
                OsStr::new("-S"),
                OsStr::new("-N"),
                OsStr::new(certificate),
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-o"),
                output.as_os_str(),
            ],
        )
    }
}

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::TccResult;
use crate::services::backends::run_tool;
use crate::services::tools::{CodeSignInspector, ToolOutput};

/// `codesign -dr - <path>`: display the designated requirement on stdout.
pub struct CodesignCommand {
    bin: PathBuf,
}

impl CodesignCommand {
    pub fn new(bin: impl AsRef<Path>) -> Self {
        Self { bin: bin.as_ref().to_path_buf() }
    }
}

impl CodeSignInspector for CodesignCommand {
    fn display_requirements(&self, path: &Path) -> TccResult<ToolOutput> {
        run_tool(&self.bin, &[OsStr::new("-dr"), OsStr::new("-"), path.as_os_str()])
    }
}

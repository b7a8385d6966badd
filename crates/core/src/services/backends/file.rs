use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::TccResult;
use crate::services::backends::run_tool;
use crate::services::tools::{MediaTypeInspector, ToolOutput};

/// `file --brief --mime-type <path>`.
pub struct FileCommand {
    bin: PathBuf,
}

impl FileCommand {
    pub fn new(bin: impl AsRef<Path>) -> Self {
        Self { bin: bin.as_ref().to_path_buf() }
    }
}

impl MediaTypeInspector for FileCommand {
    fn mime_type(&self, path: &Path) -> TccResult<ToolOutput> {
        run_tool(&self.bin, &[OsStr::new("--brief"), OsStr::new("--mime-type"), path.as_os_str()])
    }
}

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{TccError, TccResult};

/// Interpreter-directive marker at the start of a script.
pub const SHEBANG_MARKER: &str = "#!";

/// Program name that defers interpreter lookup to `PATH` at run time.
const ENV_WRAPPER: &str = "env";

/// Return the interpreter named on the first line of `script`.
///
/// `Ok(None)` when there is no shebang or the file cannot be read; callers then fall
/// back to the script path itself.
pub fn resolve_interpreter(script: &Path) -> TccResult<Option<PathBuf>> {
    let line = match read_first_line(script) {
        Ok(line) => line,
        Err(err) => {
            log::warn!("Could not read shebang from {}: {err}", script.display());
            return Ok(None);
        }
    };
    parse_shebang(script, &line)
}

/// Extract the interpreter path from a first line, rejecting `env` indirection.
pub fn parse_shebang(script: &Path, line: &str) -> TccResult<Option<PathBuf>> {
    let Some(directive) = line.strip_prefix(SHEBANG_MARKER) else {
        return Ok(None);
    };
    let Some(program) = directive.split_whitespace().next() else {
        return Ok(None);
    };
    if Path::new(program).file_name() == Some(OsStr::new(ENV_WRAPPER)) {
        return Err(TccError::AmbiguousInterpreter {
            script: script.to_path_buf(),
            line: line.to_string(),
        });
    }
    Ok(Some(PathBuf::from(program)))
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    let line = String::from_utf8_lossy(&buf);
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

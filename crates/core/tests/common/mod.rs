#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tcc_core::error::TccResult;
use tcc_core::services::backends::PlistManifestReader;
use tcc_core::services::tools::{
    CodeSignInspector, MediaTypeInspector, ProfileSigner, ToolOutput, Toolbox,
};

pub type CallLog = Arc<Mutex<Vec<PathBuf>>>;

/// Media types by extension: `.sh`/`.py` scripts, directories, everything else Mach-O.
#[derive(Default)]
pub struct FakeMedia {
    pub calls: CallLog,
}

impl MediaTypeInspector for FakeMedia {
    fn mime_type(&self, path: &Path) -> TccResult<ToolOutput> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let mime = if path.is_dir() {
            "inode/directory"
        } else {
            match path.extension().and_then(|e| e.to_str()) {
                Some("sh") => "text/x-shellscript",
                Some("py") => "text/x-python",
                _ => "application/x-mach-binary",
            }
        };
        Ok(ToolOutput::ok(format!("{mime}\n")))
    }
}

/// A `file` tool that always exits 1, for exercising classification failures.
#[derive(Default)]
pub struct FailingMedia {
    pub calls: CallLog,
}

impl MediaTypeInspector for FailingMedia {
    fn mime_type(&self, path: &Path) -> TccResult<ToolOutput> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        Ok(ToolOutput::failed(1, "file: cannot open magic database"))
    }
}

/// Toolbox whose media inspector always fails; codesign and manifests behave normally.
pub fn failing_media_toolbox() -> (Toolbox, CallLog) {
    let codesign = FakeCodesign::default();
    let calls = codesign.calls.clone();
    (Toolbox::new(FailingMedia::default(), codesign, PlistManifestReader), calls)
}

/// Paths containing `unsigned` are unsigned; everything else is signed with
/// `identifier "<path>"`. Explicit overrides win.
#[derive(Default)]
pub struct FakeCodesign {
    pub calls: CallLog,
    pub overrides: HashMap<PathBuf, ToolOutput>,
}

impl FakeCodesign {
    pub fn with_output(mut self, path: impl Into<PathBuf>, output: ToolOutput) -> Self {
        self.overrides.insert(path.into(), output);
        self
    }
}

pub fn requirement_for(path: &Path) -> String {
    format!("identifier \"{}\" and anchor apple generic", path.display())
}

impl CodeSignInspector for FakeCodesign {
    fn display_requirements(&self, path: &Path) -> TccResult<ToolOutput> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        if let Some(out) = self.overrides.get(path) {
            return Ok(out.clone());
        }
        if path.to_string_lossy().contains("unsigned") {
            return Ok(ToolOutput::failed(
                1,
                format!("{}: code object is not signed at all\n", path.display()),
            ));
        }
        Ok(ToolOutput {
            status: Some(0),
            stdout: format!(
                "Executable={}\ndesignated => {}\n",
                path.display(),
                requirement_for(path)
            ),
            stderr: String::new(),
        })
    }
}

/// Records sign requests and writes a placeholder signed file unless told to fail.
#[derive(Default)]
pub struct FakeSigner {
    pub requests: Arc<Mutex<Vec<(String, PathBuf, PathBuf)>>>,
    pub fail_with: Option<ToolOutput>,
}

impl ProfileSigner for FakeSigner {
    fn sign(&self, certificate: &str, input: &Path, output: &Path) -> TccResult<ToolOutput> {
        self.requests.lock().unwrap().push((
            certificate.to_string(),
            input.to_path_buf(),
            output.to_path_buf(),
        ));
        if let Some(fail) = &self.fail_with {
            return Ok(fail.clone());
        }
        std::fs::write(output, b"signed")?;
        Ok(ToolOutput::ok(""))
    }
}

/// Toolbox with the fakes above and the real plist manifest reader.
pub fn fake_toolbox() -> (Toolbox, CallLog) {
    let codesign = FakeCodesign::default();
    let calls = codesign.calls.clone();
    (Toolbox::new(FakeMedia::default(), codesign, PlistManifestReader), calls)
}

/// Create `<dir>/<name>.app` with an Info.plist carrying `bundle_id` (if any).
pub fn make_bundle(dir: &Path, name: &str, bundle_id: Option<&str>) -> PathBuf {
    let app = dir.join(format!("{name}.app"));
    let contents = app.join("Contents");
    std::fs::create_dir_all(&contents).unwrap();
    if let Some(id) = bundle_id {
        let mut dict = plist::Dictionary::new();
        dict.insert("CFBundleIdentifier".into(), plist::Value::String(id.into()));
        dict.insert("CFBundleName".into(), plist::Value::String(name.into()));
        plist::Value::Dictionary(dict).to_file_xml(contents.join("Info.plist")).unwrap();
    }
    app
}

/// Create a script file with the given first line.
pub fn make_script(dir: &Path, file_name: &str, shebang: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, format!("{shebang}\necho hello\n")).unwrap();
    path
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

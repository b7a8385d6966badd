use std::path::{Path, PathBuf};

use crate::error::{TccError, TccResult};
use crate::profile::PROFILE_EXTENSION;
use crate::services::tools::ProfileSigner;

/// Suffix appended to the file stem of a signed profile.
pub const SIGNED_SUFFIX: &str = "_Signed";

/// `/path/Foo.mobileconfig` -> `/path/Foo_Signed.mobileconfig`.
pub fn signed_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("profile");
    input.with_file_name(format!("{stem}{SIGNED_SUFFIX}.{PROFILE_EXTENSION}"))
}

/// Sign the profile at `input` with `certificate`, writing next to it.
///
/// Requires a certificate name and an existing `.mobileconfig` input.
pub fn sign_profile(
    signer: &dyn ProfileSigner,
    certificate: &str,
    input: &Path,
) -> TccResult<PathBuf> {
    if certificate.trim().is_empty() {
        return Err(TccError::Signing("no certificate name supplied".to_string()));
    }
    if !input.is_file() {
        return Err(TccError::MissingPath(input.to_path_buf()));
    }
    if input.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
        return Err(TccError::Signing(format!(
            "{} does not have the .{PROFILE_EXTENSION} extension",
            input.display()
        )));
    }

    let output = signed_output_path(input);
    let result = signer.sign(certificate, input, &output)?;
    if !result.success() {
        return Err(TccError::Signing(format!(
            "security cms {} while signing {}: {}",
            result.status_label(),
            input.display(),
            result.stderr.trim()
        )));
    }
    log::info!("Signed profile written to {}", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_path_sits_next_to_input() {
        assert_eq!(
            signed_output_path(Path::new("/tmp/out/Privacy.mobileconfig")),
            PathBuf::from("/tmp/out/Privacy_Signed.mobileconfig")
        );
    }
}

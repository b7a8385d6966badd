mod common;

use common::FakeSigner;
use tcc_core::services::signing::sign_profile;
use tcc_core::services::tools::ToolOutput;
use tcc_core::TccError;
use tempfile::tempdir;

#[test]
fn signs_next_to_the_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Privacy.mobileconfig");
    std::fs::write(&input, "<plist/>").unwrap();
    let signer = FakeSigner::default();
    let requests = signer.requests.clone();

    let out = sign_profile(&signer, "Developer ID Application: Example", &input).unwrap();
    assert_eq!(out, dir.path().join("Privacy_Signed.mobileconfig"));
    assert!(out.exists());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "Developer ID Application: Example");
    assert_eq!(requests[0].1, input);
}

#[test]
fn preconditions_are_checked_before_signing() {
    let dir = tempdir().unwrap();
    let signer = FakeSigner::default();

    let missing = dir.path().join("Missing.mobileconfig");
    assert!(matches!(sign_profile(&signer, "cert", &missing), Err(TccError::MissingPath(_))));

    let wrong_ext = dir.path().join("Privacy.plist");
    std::fs::write(&wrong_ext, "<plist/>").unwrap();
    let err = sign_profile(&signer, "cert", &wrong_ext).unwrap_err();
    assert!(err.to_string().contains(".mobileconfig"), "unexpected: {err}");

    let input = dir.path().join("Privacy.mobileconfig");
    std::fs::write(&input, "<plist/>").unwrap();
    assert!(matches!(sign_profile(&signer, " ", &input), Err(TccError::Signing(_))));

    assert!(signer.requests.lock().unwrap().is_empty());
}

#[test]
fn signer_failure_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Privacy.mobileconfig");
    std::fs::write(&input, "<plist/>").unwrap();
    let signer = FakeSigner {
        fail_with: Some(ToolOutput::failed(1, "security: no identity found")),
        ..Default::default()
    };

    let err = sign_profile(&signer, "Nope", &input).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("exit status 1") && msg.contains("no identity found"), "{msg}");
}

mod common;

use common::{failing_media_toolbox, fake_toolbox, make_bundle, make_script, path_str};
use tcc_core::model::{AppIdentity, IdentifierType};
use tcc_core::services::classify::{classify, MediaKind};
use tcc_core::services::identity::resolve_identity;
use tcc_core::TccError;
use tempfile::tempdir;

#[test]
fn bundle_with_manifest_resolves_to_bundle_id() {
    let dir = tempdir().unwrap();
    let app = make_bundle(dir.path(), "App", Some("com.example.App"));
    let (tools, _) = fake_toolbox();

    let identity =
        resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &path_str(&app));
    assert_eq!(identity, AppIdentity::bundle_id("com.example.App"));
}

#[test]
fn trailing_separator_is_tolerated_for_bundles() {
    let dir = tempdir().unwrap();
    let app = make_bundle(dir.path(), "App", Some("com.example.App"));
    let (tools, _) = fake_toolbox();

    let with_slash = format!("{}/", path_str(&app));
    let identity = resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &with_slash);
    assert_eq!(identity.identifier, "com.example.App");
}

#[test]
fn bundle_without_manifest_falls_back_to_stripped_path() {
    let dir = tempdir().unwrap();
    let app = make_bundle(dir.path(), "NoManifest", None);
    let (tools, _) = fake_toolbox();

    let with_slash = format!("{}/", path_str(&app));
    let identity = resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &with_slash);
    assert_eq!(identity, AppIdentity::path(path_str(&app)));
}

#[test]
fn malformed_manifest_falls_back_to_path() {
    let dir = tempdir().unwrap();
    let app = make_bundle(dir.path(), "Broken", None);
    std::fs::write(app.join("Contents/Info.plist"), "<<not a plist>>").unwrap();
    let (tools, _) = fake_toolbox();

    let identity =
        resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &path_str(&app));
    assert_eq!(identity.identifier_type, IdentifierType::Path);
}

#[test]
fn scripts_are_always_path_identities() {
    let dir = tempdir().unwrap();
    let signed = make_script(dir.path(), "tool.sh", "#!/bin/sh");
    let unsigned_interp = make_script(dir.path(), "other.py", "#!/opt/unsigned/python");
    let (tools, _) = fake_toolbox();

    for script in [signed, unsigned_interp] {
        let raw = path_str(&script);
        let identity = resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &raw);
        assert_eq!(identity, AppIdentity::path(raw));
    }
}

#[test]
fn missing_path_classifies_unknown_and_resolves_to_path() {
    let (tools, calls) = fake_toolbox();
    let kind = classify(tools.media.as_ref(), "/no/such/Thing.app/").unwrap();
    assert_eq!(kind, MediaKind::Unknown);

    let identity =
        resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), "/no/such/Thing.app/");
    assert_eq!(identity, AppIdentity::path("/no/such/Thing.app"));
    assert!(calls.lock().unwrap().is_empty(), "codesign must not be consulted for identity");
}

#[test]
fn failed_classification_still_resolves_bundle_id() {
    let dir = tempdir().unwrap();
    let app = make_bundle(dir.path(), "App", Some("com.example.App"));
    let (tools, _) = failing_media_toolbox();

    let err = classify(tools.media.as_ref(), &path_str(&app)).unwrap_err();
    assert!(matches!(err, TccError::Tool { ref tool, .. } if tool == "file"), "unexpected: {err}");

    let identity =
        resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &path_str(&app));
    assert_eq!(identity, AppIdentity::bundle_id("com.example.App"));
}

#[test]
fn failed_classification_without_manifest_falls_back_to_path() {
    let dir = tempdir().unwrap();
    let tool = dir.path().join("helper");
    std::fs::write(&tool, b"\xcf\xfa\xed\xfe").unwrap();
    let (tools, _) = failing_media_toolbox();

    let identity =
        resolve_identity(tools.media.as_ref(), tools.manifests.as_ref(), &path_str(&tool));
    assert_eq!(identity, AppIdentity::path(path_str(&tool)));
}

//! Profile assembly: the outer configuration-profile document and its serialization.
//!
//! The document carries one `PayloadContent` block of type
//! `com.apple.TCC.configuration-profile-policy` wrapping the built [`ServiceCollection`].
//! Serialization is an XML property list via the `plist` crate.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TccError, TccResult};
use crate::model::ServiceCollection;

/// File extension of configuration profiles.
pub const PROFILE_EXTENSION: &str = "mobileconfig";

/// `PayloadType` of the TCC content block.
pub const TCC_PAYLOAD_TYPE: &str = "com.apple.TCC.configuration-profile-policy";

/// `PayloadType` of the outer document.
pub const PROFILE_PAYLOAD_TYPE: &str = "Configuration";

/// Profiles are always installed system-wide.
pub const PROFILE_SCOPE: &str = "system";

/// User-supplied metadata copied into both the document and its content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub description: String,
    pub display_name: String,
    pub identifier: String,
    pub organization: String,
    pub version: u32,
}

/// The single TCC content block inside `PayloadContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PayloadContent {
    pub payload_description: String,
    pub payload_display_name: String,
    pub payload_identifier: String,
    pub payload_organization: String,
    pub payload_type: String,
    #[serde(rename = "PayloadUUID")]
    pub payload_uuid: String,
    pub payload_version: u32,
    pub services: ServiceCollection,
}

/// Outer configuration-profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileDocument {
    pub payload_content: Vec<PayloadContent>,
    pub payload_description: String,
    pub payload_display_name: String,
    pub payload_identifier: String,
    pub payload_organization: String,
    pub payload_scope: String,
    pub payload_type: String,
    #[serde(rename = "PayloadUUID")]
    pub payload_uuid: String,
    pub payload_version: u32,
}

/// Fresh upper-case hyphenated UUID string.
pub fn new_payload_uuid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

impl ProfileDocument {
    /// Assemble a document with freshly generated, distinct UUIDs.
    pub fn new(metadata: &ProfileMetadata, services: ServiceCollection) -> Self {
        let profile_uuid = new_payload_uuid();
        let mut content_uuid = new_payload_uuid();
        while content_uuid == profile_uuid {
            content_uuid = new_payload_uuid();
        }
        Self::with_uuids(metadata, services, profile_uuid, content_uuid)
    }

    /// Assemble a document with the given UUIDs (deterministic output for tests).
    pub fn with_uuids(
        metadata: &ProfileMetadata,
        services: ServiceCollection,
        profile_uuid: impl Into<String>,
        content_uuid: impl Into<String>,
    ) -> Self {
        let content_uuid = content_uuid.into();
        let content = PayloadContent {
            payload_description: metadata.description.clone(),
            payload_display_name: metadata.display_name.clone(),
            // Must differ from the root identifier.
            payload_identifier: format!("{}.{}", metadata.identifier, content_uuid),
            payload_organization: metadata.organization.clone(),
            payload_type: TCC_PAYLOAD_TYPE.to_string(),
            payload_uuid: content_uuid,
            payload_version: metadata.version,
            services,
        };

        Self {
            payload_content: vec![content],
            payload_description: metadata.description.clone(),
            payload_display_name: metadata.display_name.clone(),
            payload_identifier: metadata.identifier.clone(),
            payload_organization: metadata.organization.clone(),
            payload_scope: PROFILE_SCOPE.to_string(),
            payload_type: PROFILE_PAYLOAD_TYPE.to_string(),
            payload_uuid: profile_uuid.into(),
            payload_version: metadata.version,
        }
    }

    /// Services of the (single) content block.
    pub fn services(&self) -> Option<&ServiceCollection> {
        self.payload_content.first().map(|content| &content.services)
    }

    pub fn to_xml_bytes(&self) -> TccResult<Vec<u8>> {
        let mut buf = Vec::new();
        plist::to_writer_xml(&mut buf, self)?;
        Ok(buf)
    }

    pub fn to_xml_string(&self) -> TccResult<String> {
        let bytes = self.to_xml_bytes()?;
        String::from_utf8(bytes).map_err(|e| {
            TccError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub fn from_xml_bytes(bytes: &[u8]) -> TccResult<Self> {
        Ok(plist::from_bytes(bytes)?)
    }

    pub fn write_to_file(&self, path: &Path) -> TccResult<()> {
        plist::to_file_xml(path, self)?;
        log::info!("Profile written to {}", path.display());
        Ok(())
    }

    pub fn read_from_file(path: &Path) -> TccResult<Self> {
        Ok(plist::from_file(path)?)
    }
}

/// Expand `~`, `$VAR` and `${VAR}` from the environment and force the `.mobileconfig`
/// extension.
pub fn normalize_output_path(raw: &str) -> PathBuf {
    normalize_output_path_with(raw, |name| env::var(name).ok())
}

/// [`normalize_output_path`] with an explicit variable lookup. Unknown variables are kept
/// verbatim.
pub fn normalize_output_path_with(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let expanded = expand_vars(&expand_home(raw, &lookup), &lookup);
    let mut path = PathBuf::from(expanded);
    if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
        path.set_extension(PROFILE_EXTENSION);
    }
    path
}

fn expand_home(raw: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let Some(rest) = raw.strip_prefix('~') else {
        return raw.to_string();
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        return raw.to_string();
    }
    match lookup("HOME") {
        Some(home) => format!("{}{}", home.trim_end_matches('/'), rest),
        None => raw.to_string(),
    }
}

fn expand_vars(raw: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };
        let value = if name.is_empty() { None } else { lookup(name) };
        match value {
            Some(value) => {
                out.push_str(&value);
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProfileMetadata {
        ProfileMetadata {
            description: "Privacy grants".into(),
            display_name: "Privacy".into(),
            identifier: "org.example.tcc".into(),
            organization: "Example Org".into(),
            version: 1,
        }
    }

    #[test]
    fn new_document_has_distinct_uuids_and_fixed_fields() {
        let doc = ProfileDocument::new(&metadata(), ServiceCollection::new());
        let content = &doc.payload_content[0];
        assert_ne!(doc.payload_uuid, content.payload_uuid);
        assert_eq!(doc.payload_uuid, doc.payload_uuid.to_uppercase());
        assert_eq!(doc.payload_scope, "system");
        assert_eq!(doc.payload_type, "Configuration");
        assert_eq!(content.payload_type, TCC_PAYLOAD_TYPE);
        assert_eq!(content.payload_identifier, format!("org.example.tcc.{}", content.payload_uuid));
        assert_ne!(content.payload_identifier, doc.payload_identifier);
    }

    #[test]
    fn xml_uses_profile_keys() {
        let doc = ProfileDocument::with_uuids(&metadata(), ServiceCollection::new(), "A", "B");
        let xml = doc.to_xml_string().unwrap();
        for key in ["PayloadContent", "PayloadUUID", "PayloadScope", "Services", "PayloadVersion"] {
            assert!(xml.contains(&format!("<key>{key}</key>")), "missing {key} in {xml}");
        }
        assert!(xml.contains("<integer>1</integer>"));
    }

    #[test]
    fn output_path_gets_profile_extension() {
        assert_eq!(normalize_output_path("out/privacy"), PathBuf::from("out/privacy.mobileconfig"));
        assert_eq!(
            normalize_output_path("out/privacy.plist"),
            PathBuf::from("out/privacy.mobileconfig")
        );
        assert_eq!(
            normalize_output_path("/tmp/p.mobileconfig"),
            PathBuf::from("/tmp/p.mobileconfig")
        );
    }

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/Users/admin/".to_string()),
            "OUT" => Some("/Volumes/Share/profiles".to_string()),
            _ => None,
        }
    }

    #[test]
    fn output_path_expands_home() {
        assert_eq!(
            normalize_output_path_with("~/Desktop/p", lookup),
            PathBuf::from("/Users/admin/Desktop/p.mobileconfig")
        );
        assert_eq!(
            normalize_output_path_with("~other/p", lookup),
            PathBuf::from("~other/p.mobileconfig")
        );
        assert_eq!(
            normalize_output_path_with("~/p", |_| None),
            PathBuf::from("~/p.mobileconfig")
        );
    }

    #[test]
    fn output_path_expands_variables() {
        assert_eq!(
            normalize_output_path_with("$OUT/privacy", lookup),
            PathBuf::from("/Volumes/Share/profiles/privacy.mobileconfig")
        );
        assert_eq!(
            normalize_output_path_with("${OUT}/a_${MISSING}_b", lookup),
            PathBuf::from("/Volumes/Share/profiles/a_${MISSING}_b.mobileconfig")
        );
        assert_eq!(
            normalize_output_path_with("~/$OUT$/x${", lookup),
            PathBuf::from("/Users/admin//Volumes/Share/profiles$/x${.mobileconfig")
        );
    }
}

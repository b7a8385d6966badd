//! Core data model for TCC payloads: identities, code requirements, service entries.
//!
//! Every value here is built fresh per invocation and never persisted. Field names on
//! the serialized types match the keys of the `com.apple.TCC.configuration-profile-policy`
//! payload.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How an application is addressed in a policy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    /// Reverse-DNS bundle identifier read from `Contents/Info.plist`.
    BundleId,
    /// Filesystem path of the app or script.
    Path,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::BundleId => "bundleID",
            IdentifierType::Path => "path",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bundleID" => Ok(IdentifierType::BundleId),
            "path" => Ok(IdentifierType::Path),
            other => Err(format!("Invalid identifier type '{other}'. Allowed: bundleID, path")),
        }
    }
}

impl Serialize for IdentifierType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IdentifierType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stable identity of an application, suitable for policy matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub identifier: String,
    pub identifier_type: IdentifierType,
}

impl AppIdentity {
    pub fn bundle_id(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), identifier_type: IdentifierType::BundleId }
    }

    pub fn path(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), identifier_type: IdentifierType::Path }
    }
}

/// Designated requirement string printed by `codesign -dr -` for a signed binary.
///
/// Opaque to this crate; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CodeRequirement(String);

impl CodeRequirement {
    /// Wrap a requirement string. Returns `None` for blank input.
    pub fn new(requirement: impl Into<String>) -> Option<Self> {
        let requirement = requirement.into();
        let trimmed = requirement.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CodeRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CodeRequirement::new(raw)
            .ok_or_else(|| serde::de::Error::custom("code requirement must not be empty"))
    }
}

/// Protected service categories recognized by the TCC payload.
///
/// Declaration order is the order in which services are processed and emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKind {
    AddressBook,
    Calendar,
    Reminders,
    Photos,
    Camera,
    Microphone,
    Accessibility,
    PostEvent,
    SystemPolicyAllFiles,
    SystemPolicySysAdminFiles,
    AppleEvents,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 11] = [
        ServiceKind::AddressBook,
        ServiceKind::Calendar,
        ServiceKind::Reminders,
        ServiceKind::Photos,
        ServiceKind::Camera,
        ServiceKind::Microphone,
        ServiceKind::Accessibility,
        ServiceKind::PostEvent,
        ServiceKind::SystemPolicyAllFiles,
        ServiceKind::SystemPolicySysAdminFiles,
        ServiceKind::AppleEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::AddressBook => "AddressBook",
            ServiceKind::Calendar => "Calendar",
            ServiceKind::Reminders => "Reminders",
            ServiceKind::Photos => "Photos",
            ServiceKind::Camera => "Camera",
            ServiceKind::Microphone => "Microphone",
            ServiceKind::Accessibility => "Accessibility",
            ServiceKind::PostEvent => "PostEvent",
            ServiceKind::SystemPolicyAllFiles => "SystemPolicyAllFiles",
            ServiceKind::SystemPolicySysAdminFiles => "SystemPolicySysAdminFiles",
            ServiceKind::AppleEvents => "AppleEvents",
        }
    }

    /// Whether entries for this service pair a sending app with a receiving app.
    pub fn is_apple_events(&self) -> bool {
        matches!(self, ServiceKind::AppleEvents)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL.iter().copied().find(|kind| kind.as_str() == s).ok_or_else(|| {
            let allowed: Vec<&str> = ServiceKind::ALL.iter().map(|k| k.as_str()).collect();
            format!("Invalid service '{}'. Allowed: {}", s, allowed.join(", "))
        })
    }
}

impl Serialize for ServiceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One policy grant/deny unit for a single app (or app pair) within one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePayloadEntry {
    #[serde(rename = "Allowed")]
    pub allowed: bool,
    #[serde(rename = "CodeRequirement")]
    pub code_requirement: CodeRequirement,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "IdentifierType")]
    pub identifier_type: IdentifierType,
    #[serde(
        rename = "AEReceiverIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ae_receiver_identifier: Option<String>,
    #[serde(
        rename = "AEReceiverIdentifierType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ae_receiver_identifier_type: Option<IdentifierType>,
    #[serde(
        rename = "AEReceiverCodeRequirement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ae_receiver_code_requirement: Option<CodeRequirement>,
}

impl ServicePayloadEntry {
    pub fn new(
        identity: AppIdentity,
        allowed: bool,
        code_requirement: CodeRequirement,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            allowed,
            code_requirement,
            comment: comment.into(),
            identifier: identity.identifier,
            identifier_type: identity.identifier_type,
            ae_receiver_identifier: None,
            ae_receiver_identifier_type: None,
            ae_receiver_code_requirement: None,
        }
    }

    /// Attach the receiving side of an AppleEvents grant.
    pub fn with_receiver(mut self, receiver: AppIdentity, requirement: CodeRequirement) -> Self {
        self.ae_receiver_identifier = Some(receiver.identifier);
        self.ae_receiver_identifier_type = Some(receiver.identifier_type);
        self.ae_receiver_code_requirement = Some(requirement);
        self
    }

    pub fn is_apple_event(&self) -> bool {
        self.ae_receiver_identifier.is_some()
    }
}

/// Service name -> ordered, deduplicated entries.
///
/// Keys iterate in [`ServiceKind`] declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCollection {
    services: BTreeMap<ServiceKind, Vec<ServicePayloadEntry>>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `kind` has a (possibly empty) entry list.
    pub fn ensure_service(&mut self, kind: ServiceKind) {
        self.services.entry(kind).or_default();
    }

    /// Append `entry` unless a structurally identical entry is already present.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert(&mut self, kind: ServiceKind, entry: ServicePayloadEntry) -> bool {
        let entries = self.services.entry(kind).or_default();
        if entries.contains(&entry) {
            return false;
        }
        entries.push(entry);
        true
    }

    pub fn get(&self, kind: ServiceKind) -> Option<&[ServicePayloadEntry]> {
        self.services.get(&kind).map(|entries| entries.as_slice())
    }

    pub fn kinds(&self) -> Vec<ServiceKind> {
        self.services.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceKind, &[ServicePayloadEntry])> {
        self.services.iter().map(|(kind, entries)| (*kind, entries.as_slice()))
    }

    /// Total number of entries across all services.
    pub fn entry_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

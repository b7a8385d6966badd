use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{TccError, TccResult};
use crate::model::{CodeRequirement, ServiceCollection, ServiceKind, ServicePayloadEntry};
use crate::services::identity::resolve_identity;
use crate::services::requirement::extract_requirement;
use crate::services::strip_trailing_separators;
use crate::services::tools::Toolbox;

/// How a service treats the user's allow/deny flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPolicy {
    /// Entries follow the requested flag.
    UserChoice,
    /// Entries are always deny entries, whatever was requested.
    AlwaysDeny,
    /// Entries are always allow entries, whatever was requested.
    AlwaysAllow,
}

impl AccessPolicy {
    pub fn apply(&self, requested_allow: bool) -> bool {
        match self {
            AccessPolicy::UserChoice => requested_allow,
            AccessPolicy::AlwaysDeny => false,
            AccessPolicy::AlwaysAllow => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPolicy::UserChoice => "user-choice",
            AccessPolicy::AlwaysDeny => "always-deny",
            AccessPolicy::AlwaysAllow => "always-allow",
        }
    }
}

/// Hardware sensors can only be denied through this tool.
const DEFAULT_POLICIES: [(ServiceKind, AccessPolicy); 2] =
    [
        (ServiceKind::Camera, AccessPolicy::AlwaysDeny),
        (ServiceKind::Microphone, AccessPolicy::AlwaysDeny),
    ];

/// Per-service access policy. Services absent from the table are [`AccessPolicy::UserChoice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    policies: BTreeMap<ServiceKind, AccessPolicy>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self { policies: DEFAULT_POLICIES.into_iter().collect() }
    }
}

impl PolicyTable {
    pub fn with_policy(mut self, kind: ServiceKind, policy: AccessPolicy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    pub fn policy(&self, kind: ServiceKind) -> AccessPolicy {
        self.policies.get(&kind).copied().unwrap_or(AccessPolicy::UserChoice)
    }

    /// Effective `Allowed` value for an entry of `kind`.
    pub fn resolve(&self, kind: ServiceKind, requested_allow: bool) -> bool {
        self.policy(kind).apply(requested_allow)
    }
}

/// Split an AppleEvents value into `(sender, receiver)`.
pub fn split_event_pair(value: &str) -> TccResult<(&str, &str)> {
    let parts: Vec<&str> = value.split(',').collect();
    match parts.as_slice() {
        [sender, receiver] if !sender.trim().is_empty() && !receiver.trim().is_empty() => {
            Ok((sender.trim(), receiver.trim()))
        }
        _ => Err(TccError::AppleEventsPair { value: value.to_string() }),
    }
}

/// Human-friendly application name: the file stem of the path.
pub fn app_display_name(app_path: &str) -> String {
    let stripped = strip_trailing_separators(app_path);
    Path::new(stripped)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(stripped)
        .to_string()
}

fn verdict(allowed: bool) -> &'static str {
    if allowed {
        "Allow"
    } else {
        "Deny"
    }
}

/// Comment for a standard entry, e.g. `Allow Accessibility control for Terminal`.
pub fn service_comment(kind: ServiceKind, allowed: bool, app_path: &str) -> String {
    format!("{} {} control for {}", verdict(allowed), kind, app_display_name(app_path))
}

/// Comment for an AppleEvents entry, e.g. `Allow Foo to send AppleEvents control to Bar`.
pub fn event_comment(allowed: bool, sender: &str, receiver: &str) -> String {
    format!(
        "{} {} to send {} control to {}",
        verdict(allowed),
        app_display_name(sender),
        ServiceKind::AppleEvents,
        app_display_name(receiver)
    )
}

/// Builds service entries from application paths.
pub struct PayloadBuilder<'a> {
    tools: &'a Toolbox,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(tools: &'a Toolbox) -> Self {
        Self { tools }
    }

    /// Build one entry. For AppleEvents (`is_event`), `app_path` must be `sender,receiver`;
    /// the receiver's identity and requirement are derived independently of `code_requirement`,
    /// which belongs to the sender.
    pub fn build_entry(
        &self,
        app_path: &str,
        allowed: bool,
        is_event: bool,
        code_requirement: CodeRequirement,
        comment: impl Into<String>,
    ) -> TccResult<ServicePayloadEntry> {
        let media = self.tools.media.as_ref();
        let manifests = self.tools.manifests.as_ref();

        if !is_event {
            let identity = resolve_identity(media, manifests, app_path);
            return Ok(ServicePayloadEntry::new(identity, allowed, code_requirement, comment));
        }

        let (sender, receiver) = split_event_pair(app_path)?;
        let identity = resolve_identity(media, manifests, sender);
        let receiver_identity = resolve_identity(media, manifests, receiver);
        let receiver_requirement =
            extract_requirement(media, self.tools.codesign.as_ref(), receiver)?;
        Ok(ServicePayloadEntry::new(identity, allowed, code_requirement, comment)
            .with_receiver(receiver_identity, receiver_requirement))
    }
}

/// Build every requested service, in [`ServiceKind`] order then in the order paths were given.
///
/// Only services with at least one path get a key. Fails before touching any tool when
/// nothing was requested or an AppleEvents value is malformed.
pub fn build_services(
    tools: &Toolbox,
    policies: &PolicyTable,
    apps: &BTreeMap<ServiceKind, Vec<String>>,
    requested_allow: bool,
) -> TccResult<ServiceCollection> {
    if apps.values().all(|paths| paths.is_empty()) {
        return Err(TccError::NoServices);
    }
    if let Some(events) = apps.get(&ServiceKind::AppleEvents) {
        for value in events {
            split_event_pair(value)?;
        }
    }

    let builder = PayloadBuilder::new(tools);
    let media = tools.media.as_ref();
    let codesign = tools.codesign.as_ref();
    let mut services = ServiceCollection::new();

    for kind in ServiceKind::ALL {
        let Some(paths) = apps.get(&kind).filter(|paths| !paths.is_empty()) else {
            continue;
        };
        services.ensure_service(kind);
        let allowed = policies.resolve(kind, requested_allow);
        if allowed != requested_allow {
            log::info!("{kind} is {}; building deny entries", policies.policy(kind).as_str());
        }

        for app in paths {
            let entry = if kind.is_apple_events() {
                let (sender, receiver) = split_event_pair(app)?;
                let requirement = extract_requirement(media, codesign, sender)?;
                let comment = event_comment(allowed, sender, receiver);
                builder.build_entry(app, allowed, true, requirement, comment)?
            } else {
                let requirement = extract_requirement(media, codesign, app)?;
                let comment = service_comment(kind, allowed, app);
                builder.build_entry(app, allowed, false, requirement, comment)?
            };

            if !services.insert(kind, entry) {
                log::debug!("Skipping duplicate {kind} entry for {app}");
            }
        }
    }

    Ok(services)
}

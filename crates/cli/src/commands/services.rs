use anyhow::Result;
use serde::Serialize;

use tcc_core::model::ServiceKind;
use tcc_core::services::payload::PolicyTable;

use crate::commands::util::print_json;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub flags: Vec<String>,
    pub policy: String,
}

/// Long flag and short alias of `generate` for each service.
pub fn service_flags(kind: ServiceKind) -> (&'static str, &'static str) {
    match kind {
        ServiceKind::AddressBook => ("--address-book", "--ab"),
        ServiceKind::Calendar => ("--calendar", "--cal"),
        ServiceKind::Reminders => ("--reminders", "--rem"),
        ServiceKind::Photos => ("--photos", "--pho"),
        ServiceKind::Camera => ("--camera", "--cam"),
        ServiceKind::Microphone => ("--microphone", "--mic"),
        ServiceKind::Accessibility => ("--accessibility", "--acc"),
        ServiceKind::PostEvent => ("--post-event", "--pe"),
        ServiceKind::SystemPolicyAllFiles => ("--allfiles", "--af"),
        ServiceKind::SystemPolicySysAdminFiles => ("--sysadminfiles", "--sf"),
        ServiceKind::AppleEvents => ("--appleevents", "--ae"),
    }
}

pub fn service_infos() -> Vec<ServiceInfo> {
    let policies = PolicyTable::default();
    ServiceKind::ALL
        .iter()
        .map(|&kind| {
            let (long, alias) = service_flags(kind);
            ServiceInfo {
                name: kind.as_str().to_string(),
                flags: vec![long.to_string(), alias.to_string()],
                policy: policies.policy(kind).as_str().to_string(),
            }
        })
        .collect()
}

/// List the services `generate` can configure, in the order they are emitted.
pub fn list_services_command(json: bool) -> Result<()> {
    let entries = service_infos();

    if json {
        return print_json(&entries, "services");
    }

    println!("Services:");
    for entry in entries {
        println!("- {} ({}) [{}]", entry.name, entry.flags.join(", "), entry.policy);
    }

    Ok(())
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use tcc_core::config::{load_profile_request, ProfileRequest};
use tcc_core::model::ServiceKind;
use tcc_core::profile::{normalize_output_path, ProfileDocument};
use tcc_core::services::payload::{build_services, PolicyTable};
use tcc_core::services::signing::sign_profile;
use tcc_core::services::tools::{system_signer, Toolbox};

use crate::commands::util::{system_toolbox, tool_paths_from_env};

/// Flags accepted by `generate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Apps allowed to access contacts.
    #[arg(long = "address-book", visible_alias = "ab", num_args = 1.., value_name = "APP")]
    pub address_book: Vec<String>,

    /// Apps allowed to access calendars.
    #[arg(long, visible_alias = "cal", num_args = 1.., value_name = "APP")]
    pub calendar: Vec<String>,

    /// Apps allowed to access reminders.
    #[arg(long, visible_alias = "rem", num_args = 1.., value_name = "APP")]
    pub reminders: Vec<String>,

    /// Apps allowed to access the photo library.
    #[arg(long, visible_alias = "pho", num_args = 1.., value_name = "APP")]
    pub photos: Vec<String>,

    /// Apps to deny camera access (always a deny entry).
    #[arg(long, visible_alias = "cam", num_args = 1.., value_name = "APP")]
    pub camera: Vec<String>,

    /// Apps to deny microphone access (always a deny entry).
    #[arg(long, visible_alias = "mic", num_args = 1.., value_name = "APP")]
    pub microphone: Vec<String>,

    /// Apps allowed to control the computer through accessibility.
    #[arg(long, visible_alias = "acc", num_args = 1.., value_name = "APP")]
    pub accessibility: Vec<String>,

    /// Apps allowed to post synthetic input events.
    #[arg(long = "post-event", visible_alias = "pe", num_args = 1.., value_name = "APP")]
    pub post_event: Vec<String>,

    /// Apps allowed full disk access.
    #[arg(long, visible_alias = "af", num_args = 1.., value_name = "APP")]
    pub allfiles: Vec<String>,

    /// Apps allowed access to system administration files.
    #[arg(long, visible_alias = "sf", num_args = 1.., value_name = "APP")]
    pub sysadminfiles: Vec<String>,

    /// AppleEvents grants, each given as `sender,receiver`.
    #[arg(long, visible_alias = "ae", num_args = 1.., value_name = "SENDER,RECEIVER")]
    pub appleevents: Vec<String>,

    /// Allow access instead of denying it (Camera and Microphone are always denied).
    #[arg(long, default_value_t = false)]
    pub allow: bool,

    /// Profile description.
    #[arg(long = "payload-description", visible_alias = "pd")]
    pub payload_description: Option<String>,

    /// Reverse-DNS profile identifier, e.g. `org.example.tcc`.
    #[arg(long = "payload-identifier", visible_alias = "pi")]
    pub payload_identifier: Option<String>,

    /// Profile display name.
    #[arg(long = "payload-name", visible_alias = "pn")]
    pub payload_name: Option<String>,

    /// Organization shown for the profile.
    #[arg(long = "payload-org", visible_alias = "po")]
    pub payload_org: Option<String>,

    /// Profile version.
    #[arg(long = "payload-version", visible_alias = "pv")]
    pub payload_version: Option<u32>,

    /// Write the profile here (`.mobileconfig` is appended if missing) instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Sign the written profile with this certificate (requires `--output`).
    #[arg(short, long, value_name = "CERTIFICATE")]
    pub sign: Option<String>,

    /// YAML or JSON request file; explicit flags override its values.
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,
}

impl GenerateArgs {
    /// App lists keyed by service. Services without apps are left out.
    pub fn service_apps(&self) -> BTreeMap<ServiceKind, Vec<String>> {
        let lists = [
            (ServiceKind::AddressBook, &self.address_book),
            (ServiceKind::Calendar, &self.calendar),
            (ServiceKind::Reminders, &self.reminders),
            (ServiceKind::Photos, &self.photos),
            (ServiceKind::Camera, &self.camera),
            (ServiceKind::Microphone, &self.microphone),
            (ServiceKind::Accessibility, &self.accessibility),
            (ServiceKind::PostEvent, &self.post_event),
            (ServiceKind::SystemPolicyAllFiles, &self.allfiles),
            (ServiceKind::SystemPolicySysAdminFiles, &self.sysadminfiles),
            (ServiceKind::AppleEvents, &self.appleevents),
        ];
        lists
            .into_iter()
            .filter(|(_, apps)| !apps.is_empty())
            .map(|(kind, apps)| (kind, apps.clone()))
            .collect()
    }

    /// The request described by the flags alone.
    pub fn to_request(&self) -> ProfileRequest {
        ProfileRequest {
            description: self.payload_description.clone(),
            identifier: self.payload_identifier.clone(),
            name: self.payload_name.clone(),
            organization: self.payload_org.clone(),
            version: self.payload_version,
            allow: self.allow,
            output: self.output.clone(),
            sign: self.sign.clone(),
            services: self.service_apps(),
        }
    }

    /// The request file (if any) with the flags layered on top.
    pub fn resolve_request(&self) -> Result<ProfileRequest> {
        let base = match &self.request {
            Some(path) => load_profile_request(path)?,
            None => ProfileRequest::default(),
        };
        Ok(base.merge(self.to_request()))
    }
}

/// Validate `request` and build its profile document with `tools`.
pub fn build_profile(request: &ProfileRequest, tools: &Toolbox) -> Result<ProfileDocument> {
    let metadata = request.validate()?;
    let services =
        build_services(tools, &PolicyTable::default(), &request.services, request.allow)?;
    log::debug!(
        "Built {} entries across {} services",
        services.entry_count(),
        services.kinds().len()
    );
    Ok(ProfileDocument::new(&metadata, services))
}

/// Generate a profile and print it, or write (and optionally sign) it.
pub fn generate_command(args: &GenerateArgs) -> Result<()> {
    let request = args.resolve_request()?;
    let document = build_profile(&request, &system_toolbox())?;

    let Some(raw_output) = request.output.as_deref() else {
        let xml = document.to_xml_string().context("Failed to serialize profile")?;
        println!("{}", xml.trim_end_matches('\n'));
        return Ok(());
    };

    let path = normalize_output_path(raw_output);
    write_profile(&document, &path)?;
    println!("Profile written to {}", path.display());

    if let Some(certificate) = request.sign.as_deref() {
        let signer = system_signer(&tool_paths_from_env());
        let signed = sign_profile(&signer, certificate, &path)
            .with_context(|| format!("Failed to sign {}", path.display()))?;
        println!("Signed profile written to {}", signed.display());
    }

    Ok(())
}

fn write_profile(document: &ProfileDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
    }
    document
        .write_to_file(path)
        .with_context(|| format!("Failed to write profile to {}", path.display()))
}

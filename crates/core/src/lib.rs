//! tcc-core
//!
//! Core library for building macOS Privacy Preferences Policy Control (TCC) profiles.
//!
//! This crate owns the payload-derivation engine: classifying an application path,
//! resolving its identity (bundle identifier or path), extracting its designated code
//! requirement, and assembling service entries into a profile document.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends. External tools (`file`, `codesign`, `security`) sit behind
//! the capability traits in [`services::tools`].

pub mod config;
pub mod error;
pub mod model;
pub mod profile;
pub mod services;

pub use error::{TccError, TccResult};

/// Returns the library version as encoded at compile time.
///
/// Reported by `tccprofile --version`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

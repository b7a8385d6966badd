use std::path::PathBuf;

use thiserror::Error;

/// Error type for payload derivation and profile assembly.
#[derive(Debug, Error)]
pub enum TccError {
    /// Command-line or request misuse (missing metadata, `--sign` without output, ...).
    #[error("{0}")]
    Usage(String),

    /// No service category carried any application paths.
    #[error("You must provide at least one payload type to create a profile.")]
    NoServices,

    /// An AppleEvents value was not exactly `sender,receiver`.
    #[error(
        "AppleEvents applications must be in the format of \
         /Application/Path/EventSending.app,/Application/Path/EventReceiving.app (got '{value}')"
    )]
    AppleEventsPair { value: String },

    /// A path that must exist on disk does not.
    #[error("No such file or directory: {0}")]
    MissingPath(PathBuf),

    /// The code-signing inspector reports the target is not signed.
    ///
    /// Fatal for the whole run: an unsigned target cannot be policy-bound.
    #[error("App at {0} is not signed. Exiting.")]
    NotSigned(PathBuf),

    /// A script's shebang goes through `env`, so the real interpreter is only known at run time.
    #[error("Cannot check codesign for {script}: shebang '{line}' refers to 'env'")]
    AmbiguousInterpreter { script: PathBuf, line: String },

    /// The code-signing inspector succeeded but printed no usable designated requirement.
    #[error("No designated requirement found for {path}")]
    MissingRequirement { path: PathBuf },

    /// An application manifest could not supply a bundle identifier.
    #[error("Cannot read bundle identifier from {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// An external tool could not be spawned or failed in an unrecognized way.
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    /// Signing preconditions failed or the signer exited non-zero.
    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Property list error: {0}")]
    Plist(#[from] plist::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for core operations.
pub type TccResult<T> = Result<T, TccError>;

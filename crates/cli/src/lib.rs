pub mod commands;

use log::LevelFilter;

/// Log level implied by the global `--verbose`/`--quiet` flags, if either was given.
///
/// `None` leaves the level to `RUST_LOG` (default `warn`).
pub fn log_level_override(verbose: bool, quiet: bool) -> Option<LevelFilter> {
    match (verbose, quiet) {
        (true, _) => Some(LevelFilter::Debug),
        (false, true) => Some(LevelFilter::Error),
        (false, false) => None,
    }
}

/// Initialize `env_logger` on stderr. Safe to call more than once.
pub fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = log_level_override(verbose, quiet) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

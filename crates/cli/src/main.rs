use anyhow::Result;
use clap::{Parser, Subcommand};

use tccprofile::commands::{
    generate_command, inspect_command, list_services_command, GenerateArgs,
};

/// Generate macOS privacy (TCC) configuration profiles.
///
/// This CLI is a thin wrapper around `tcc-core` (exposed in code as `tcc_core`).
/// Path inspection, payload building and serialization all live in the library.
#[derive(Parser, Debug)]
#[command(
    name = "tccprofile",
    version = tcc_core::version(),
    about = "Generate macOS privacy preferences (TCC) configuration profiles",
    long_about = None
)]
struct Cli {
    /// Log debug output (tool invocations, fallbacks) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a TCC profile for the given applications.
    ///
    /// Without `--output`, the profile XML is printed to stdout.
    Generate(GenerateArgs),

    /// Show how each path would be classified, identified and signed.
    ///
    /// Nothing is written; this is a diagnostic aid.
    Inspect {
        /// Application bundles, binaries or scripts to inspect.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the privacy services this tool can configure.
    ListServices {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tccprofile::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Generate(args) => generate_command(&args)?,
        Command::Inspect { paths, json } => inspect_command(&paths, json)?,
        Command::ListServices { json } => list_services_command(json)?,
    }

    Ok(())
}

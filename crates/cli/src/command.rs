use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// Builds the `build-runfiles` command definition.
///
/// Flags mirror the upstream tool's surface exactly, long-only and
/// underscore-spelled; the two positionals are both required.
pub(crate) fn clap_command() -> Command {
    Command::new("build-runfiles")
        .about("Materializes a runfiles tree from a runfiles manifest")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_subcommand(true)
        .arg(
            Arg::new("allow_relative")
                .long("allow_relative")
                .action(ArgAction::SetTrue)
                .help("Permit relative link targets in the manifest"),
        )
        .arg(
            Arg::new("use_metadata")
                .long("use_metadata")
                .action(ArgAction::SetTrue)
                .help("Treat every even-numbered manifest line as opaque metadata"),
        )
        .arg(
            Arg::new("windows_compatible")
                .long("windows_compatible")
                .action(ArgAction::SetTrue)
                .help("Materialize links as hardlinks and directory junctions"),
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Runfiles manifest to read"),
        )
        .arg(
            Arg::new("runfiles")
                .value_name("RUNFILES")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output directory to reconcile"),
        )
}

// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # wasmlc
//!
//! Tooling around light-client contract upgrades: packaging artifacts and
//! managing scenario configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};

// Import command modules
mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "wasmlc",
    version,
    about = "Light-client contract upgrade tooling.",
    long_about = "wasmlc compresses light-client contract artifacts for MsgStoreCode and generates the configuration read by upgrade scenarios."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a contract artifact and print its checksum.
    Package(package::PackageArgs),

    /// Generate and validate scenario configurations.
    Config(config::ConfigCmdArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    wasmlc_telemetry::init::init_tracing()?;

    match cli.command {
        Commands::Package(args) => package::run(args),
        Commands::Config(args) => config::run(args),
    }
}

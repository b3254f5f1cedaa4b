// Path: crates/cli/src/commands/config.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use wasmlc_types::config::ScenarioConfig;

#[derive(Parser, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    pub command: ConfigSubCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubCommands {
    /// Generate a scenario.toml with the default settings.
    New {
        #[clap(long, default_value = ".")]
        out_dir: PathBuf,
        /// Path of the contract artifact to upgrade to.
        #[clap(long)]
        artifact: Option<PathBuf>,
        #[clap(long)]
        chain_id: Option<String>,
    },
    /// Load and validate an existing scenario.toml.
    Check {
        #[clap(default_value = "scenario.toml")]
        path: PathBuf,
    },
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigSubCommands::New {
            out_dir,
            artifact,
            chain_id,
        } => {
            fs::create_dir_all(&out_dir)?;

            let mut cfg = ScenarioConfig::default();
            if let Some(artifact) = artifact {
                cfg.artifact = artifact;
            }
            if let Some(chain_id) = chain_id {
                cfg.chain.chain_id = chain_id;
            }
            cfg.validate()?;

            let path = out_dir.join("scenario.toml");
            fs::write(&path, toml::to_string_pretty(&cfg)?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Generated {}", path.display());
        }
        ConfigSubCommands::Check { path } => {
            let cfg = ScenarioConfig::load(&path)?;
            println!(
                "{} is valid: chain {}, artifact {}, timeout {:?}, interval {:?}",
                path.display(),
                cfg.chain.chain_id,
                cfg.artifact.display(),
                cfg.poll.timeout(),
                cfg.poll.interval()
            );
        }
    }
    Ok(())
}

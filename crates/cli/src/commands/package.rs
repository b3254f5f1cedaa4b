// Path: crates/cli/src/commands/package.rs

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use wasmlc_cli::testing::package_artifact;

#[derive(Parser, Debug)]
pub struct PackageArgs {
    /// The light-client contract to compress.
    pub artifact: PathBuf,
    /// Write the gzip stream here.
    #[clap(long)]
    pub out: Option<PathBuf>,
    /// Print the summary as JSON.
    #[clap(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PackageSummary {
    artifact: String,
    checksum: String,
    original_len: usize,
    compressed_len: usize,
    out: Option<String>,
}

pub fn run(args: PackageArgs) -> Result<()> {
    let payload = package_artifact(&args.artifact)?;
    if let Some(out) = &args.out {
        std::fs::write(out, &payload.bytes)
            .with_context(|| format!("writing {}", out.display()))?;
    }

    let summary = PackageSummary {
        artifact: args.artifact.display().to_string(),
        checksum: payload.checksum_hex(),
        original_len: payload.original_len,
        compressed_len: payload.len(),
        out: args.out.as_ref().map(|p| p.display().to_string()),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("checksum:   {}", summary.checksum);
        println!("original:   {} bytes", summary.original_len);
        println!("compressed: {} bytes", summary.compressed_len);
        if let Some(out) = &summary.out {
            println!("written to: {}", out);
        }
    }
    Ok(())
}

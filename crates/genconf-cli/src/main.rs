// crates/genconf-cli/src/main.rs

//! Command-line wrapper around the configuration builder. Runs once per
//! deployment, before the server starts; any failure aborts the deployment
//! with a non-zero exit code.

use clap::Parser;
use genconf::{ConfigurationBuilder, Metadata};
use std::path::PathBuf;
use std::process::ExitCode;

/// Rewrites a Tomcat base directory's conf/context.xml and conf/server.xml
/// from a declarative metadata descriptor.
#[derive(Debug, Parser)]
#[command(name = "genconf", version, about)]
struct Cli {
    /// Path to the metadata descriptor (JSON).
    #[arg(long)]
    metadata: PathBuf,

    /// Tomcat base directory containing conf/context.xml and conf/server.xml.
    #[arg(long)]
    base_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let metadata = match Metadata::from_file(&cli.metadata) {
        Ok(metadata) => metadata,
        Err(error) => {
            eprintln!("genconf: {error}");
            return ExitCode::FAILURE;
        }
    };

    match ConfigurationBuilder::new(metadata).build_configuration_files(&cli.base_dir) {
        Ok(()) => {
            log::info!("Configuration written to {}", cli.base_dir.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("genconf: {error}");
            ExitCode::FAILURE
        }
    }
}

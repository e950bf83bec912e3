use clap::{Parser, Subcommand};
use ingest::{add, remove};
use std::path::PathBuf;
use telemetry::{get_subscriber, init_subscriber};

/// Maintain the static newsletter document
#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the newsletter document from saved emails", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add newsletters from .eml files or directories of them
    Add {
        /// The newsletter document to update
        #[arg(long, default_value = "data/newsletters.json")]
        data: PathBuf,

        /// .eml files, or directories whose .eml files are all added
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Remove newsletters by id
    Remove {
        /// The newsletter document to update
        #[arg(long, default_value = "data/newsletters.json")]
        data: PathBuf,

        /// Ids of the newsletters to remove
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let subscriber = get_subscriber("ingest".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    match args.command {
        Commands::Add { data, inputs } => {
            let report = add(&data, &inputs)?;
            println!(
                "Added {} newsletters, skipped {} existing, {} failed.",
                report.added.len(),
                report.skipped.len(),
                report.failed.len()
            );
        }
        Commands::Remove { data, ids } => {
            let removed = remove(&data, &ids)?;
            println!("Removed {} entries.", removed);
        }
    }

    Ok(())
}

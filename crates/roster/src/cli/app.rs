use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{display::DisplayArgs, ingest::IngestArgs};

#[derive(Debug, Parser)]
#[command(
    name = "roster",
    version,
    about = "Import customer and vehicle records and list them back"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// SQLite database file. Defaults to ~/.roster/roster.sqlite
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read customer records from a delimited file and save them
    Ingest(IngestArgs),
    /// Print saved customers, optionally sorted
    Display(DisplayArgs),
}

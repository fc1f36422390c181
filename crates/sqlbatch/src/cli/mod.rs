mod check;
mod split;

pub use check::CheckCommand;
pub use split::SplitCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// sqlbatch - batch-aware migration script tooling
#[derive(Parser)]
#[command(name = "sqlbatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the executable batches of a script.
    Split(SplitCommand),

    /// Parse a script and report anything suspicious.
    Check(CheckCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Split(cmd) => cmd.execute().await,
            Commands::Check(cmd) => cmd.execute().await,
        }
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;

use sqlbatch_core::{Dialect, DialectKind};
use sqlbatch_runtime::{BatchEvent, BatchParser};

use super::split::load_config;

/// Parse a script and report anything suspicious without executing it.
#[derive(Parser)]
pub struct CheckCommand {
    /// Script file to check.
    pub script: PathBuf,

    /// Configuration file path.
    #[arg(short, long, default_value = "sqlbatch.toml")]
    pub config: String,

    /// Dialect the script is written for. Overrides the config file.
    #[arg(short, long)]
    pub dialect: Option<DialectKind>,
}

impl CheckCommand {
    pub async fn execute(self) -> Result<()> {
        let config = load_config(&self.config)?;
        let dialect = Dialect::for_kind(self.dialect.unwrap_or(config.dialect));

        let script = std::fs::read_to_string(&self.script)
            .with_context(|| format!("Failed to read script: {}", self.script.display()))?;

        let mut parser = BatchParser::new(&dialect, &script, false);
        let batch_count = parser
            .by_ref()
            .filter(|e| matches!(e, BatchEvent::BatchReady { .. }))
            .count();
        let warnings = parser.warnings().to_vec();

        println!();
        println!(
            "  {} {}",
            style("sqlbatch").bold().cyan(),
            self.script.display()
        );
        println!();
        println!("  {} {} batch(es) found", style("ℹ").blue(), batch_count);

        if warnings.is_empty() {
            println!("  {} No problems found", style("✓").green());
            println!();
            return Ok(());
        }

        for warning in &warnings {
            println!(
                "  {} {} at {}",
                style("!").yellow(),
                warning.detail,
                warning.position
            );
        }
        println!();

        bail!("{} warning(s) in {}", warnings.len(), self.script.display());
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use sqlbatch_core::{Dialect, DialectKind, Position, RunnerConfig};
use sqlbatch_runtime::{BatchEvent, BatchParser};

/// Show the executable batches of a migration script.
#[derive(Parser)]
pub struct SplitCommand {
    /// Script file to split.
    pub script: PathBuf,

    /// Configuration file path.
    #[arg(short, long, default_value = "sqlbatch.toml")]
    pub config: String,

    /// Dialect the script is written for. Overrides the config file.
    #[arg(short, long)]
    pub dialect: Option<DialectKind>,

    /// Drop comment text from batches.
    #[arg(long)]
    pub strip_comments: bool,
}

impl SplitCommand {
    pub async fn execute(self) -> Result<()> {
        let config = load_config(&self.config)?;
        let dialect = Dialect::for_kind(self.dialect.unwrap_or(config.dialect));
        let strip_comments = self.strip_comments || config.processor.strip_comments;

        let script = std::fs::read_to_string(&self.script)
            .with_context(|| format!("Failed to read script: {}", self.script.display()))?;

        let mut parser = BatchParser::new(&dialect, &script, strip_comments);
        let events: Vec<BatchEvent> = parser.by_ref().collect();

        println!();
        println!(
            "  {} {}",
            style("sqlbatch").bold().cyan(),
            self.script.display()
        );
        println!();

        let mut held: Option<(String, Position)> = None;
        let mut index = 0;
        for event in events {
            match event {
                BatchEvent::BatchReady { sql, position } => held = Some((sql, position)),
                BatchEvent::Separator { count, .. } => {
                    if let Some((sql, position)) = held.take() {
                        index += 1;
                        print_batch(index, &sql, position, count);
                    }
                }
            }
        }
        if let Some((sql, position)) = held.take() {
            index += 1;
            print_batch(index, &sql, position, 1);
        }

        if index == 0 {
            println!(
                "  {} Script contains no executable batches",
                style("ℹ").blue()
            );
        } else {
            println!("  {} {} batch(es)", style("✓").green(), index);
        }
        println!();

        Ok(())
    }
}

/// Load the config file when it exists; a missing file means defaults.
pub(crate) fn load_config(path: &str) -> Result<RunnerConfig> {
    if Path::new(path).exists() {
        Ok(RunnerConfig::from_file(path)?)
    } else {
        tracing::debug!("No config file at {}; using defaults", path);
        Ok(RunnerConfig::default())
    }
}

fn print_batch(index: usize, sql: &str, position: Position, count: u32) {
    println!(
        "  {} Batch {} ({}), runs {}x:",
        style("→").dim(),
        index,
        position,
        count
    );
    for line in sql.lines() {
        println!("      {}", line);
    }
    println!();
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::error::{Result, SqlBatchError};

/// Root configuration for a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Dialect the scripts are written for.
    #[serde(default = "default_dialect")]
    pub dialect: DialectKind,

    /// Processor behaviour.
    #[serde(default)]
    pub processor: ProcessorOptions,
}

impl RunnerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SqlBatchError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SqlBatchError::Config(format!("Failed to parse config: {}", e)))
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            processor: ProcessorOptions::default(),
        }
    }
}

fn default_dialect() -> DialectKind {
    DialectKind::SybaseAse
}

/// Options controlling how scripts are parsed and executed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProcessorOptions {
    /// Log batches without sending anything to the database.
    #[serde(default)]
    pub preview_only: bool,

    /// Drop comment text from batches before execution.
    #[serde(default)]
    pub strip_comments: bool,
}

impl ProcessorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview_only(mut self, preview_only: bool) -> Self {
        self.preview_only = preview_only;
        self
    }

    pub fn with_strip_comments(mut self, strip_comments: bool) -> Self {
        self.strip_comments = strip_comments;
        self
    }
}

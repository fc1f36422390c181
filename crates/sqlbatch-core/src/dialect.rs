use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlBatchError;

/// Identifiers for the supported batch dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    SybaseAse,
    SqlServer,
}

impl DialectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::SybaseAse => "sybase_ase",
            DialectKind::SqlServer => "sql_server",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = SqlBatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sybase_ase" | "sybase-ase" | "ase" => Ok(DialectKind::SybaseAse),
            "sql_server" | "sql-server" | "mssql" => Ok(DialectKind::SqlServer),
            other => Err(SqlBatchError::Config(format!(
                "Unknown dialect: {other}"
            ))),
        }
    }
}

/// Lexical and naming facts the parser and introspection queries need.
///
/// A dialect is a plain data record; adding a dialect means adding a
/// constructor, not a subclass.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub kind: DialectKind,
    /// Keyword that ends a batch when it appears alone on a line.
    pub separator_keyword: &'static str,
    /// Schema assumed when a migration does not name one.
    pub default_schema: &'static str,
}

impl Dialect {
    pub fn sybase_ase() -> Self {
        Self {
            kind: DialectKind::SybaseAse,
            separator_keyword: "GO",
            default_schema: "dbo",
        }
    }

    pub fn sql_server() -> Self {
        Self {
            kind: DialectKind::SqlServer,
            separator_keyword: "GO",
            default_schema: "dbo",
        }
    }

    pub fn for_kind(kind: DialectKind) -> Self {
        match kind {
            DialectKind::SybaseAse => Self::sybase_ase(),
            DialectKind::SqlServer => Self::sql_server(),
        }
    }

    /// Resolve a possibly-empty schema name to the dialect default.
    pub fn schema_or_default<'a>(&self, schema: &'a str) -> &'a str {
        if schema.is_empty() {
            self.default_schema
        } else {
            schema
        }
    }
}

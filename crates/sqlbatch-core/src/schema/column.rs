use serde::{Deserialize, Serialize};

use super::quoter::{quote_constraint_name, quote_identifier, quote_value};
use super::types::SqlType;

/// Whether a column definition is part of a new table or an alteration.
///
/// ASE only attaches a named default constraint when the column is being
/// created; altered columns keep their existing constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnModification {
    Create,
    Alter,
}

/// Definition of a table column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Table the column belongs to.
    pub table: String,
    /// SQL type.
    pub sql_type: SqlType,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Whether this is an identity column.
    pub identity: bool,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Default value expression.
    pub default: Option<String>,
    /// How the definition is being used.
    pub modification: ColumnModification,
}

impl ColumnDef {
    /// Create a new non-nullable column for table creation.
    pub fn new(table: &str, name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            sql_type,
            nullable: false,
            identity: false,
            primary_key: false,
            default: None,
            modification: ColumnModification::Create,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_modification(mut self, modification: ColumnModification) -> Self {
        self.modification = modification;
        self
    }
}

/// Name given to a generated default constraint.
pub fn default_constraint_name(table: &str, column: &str) -> String {
    format!("DF_{}_{}", table, column)
}

/// Format the DEFAULT clause for a column.
///
/// Function-call expressions (anything ending in `()`) pass through verbatim.
/// Literal defaults are quoted, and on newly created columns they get a named
/// `CONSTRAINT DF_<table>_<column>` prefix; altered columns render nothing.
pub fn format_default(column: &ColumnDef) -> String {
    let Some(default) = column.default.as_deref() else {
        return String::new();
    };

    if default.ends_with("()") {
        return format!("DEFAULT {}", default);
    }

    if column.modification == ColumnModification::Create {
        return format!(
            "CONSTRAINT {} DEFAULT {}",
            quote_constraint_name(&default_constraint_name(&column.table, &column.name)),
            quote_value(default)
        );
    }

    String::new()
}

/// Format the identity marker for a column.
pub fn format_identity(column: &ColumnDef) -> &'static str {
    if column.identity {
        "IDENTITY"
    } else {
        ""
    }
}

/// Format the (not) null constraint.
///
/// Identity columns never carry an explicit nullability clause.
pub fn format_nullable(column: &ColumnDef) -> &'static str {
    if column.nullable || column.identity {
        ""
    } else {
        "NOT NULL"
    }
}

/// Render a single column definition clause.
pub fn generate_column(column: &ColumnDef) -> String {
    generate_column_inner(column, true)
}

fn generate_column_inner(column: &ColumnDef, inline_primary_key: bool) -> String {
    let mut parts = vec![quote_identifier(&column.name), column.sql_type.to_sql()];

    let identity = format_identity(column);
    if !identity.is_empty() {
        parts.push(identity.to_string());
    }

    let nullable = format_nullable(column);
    if !nullable.is_empty() {
        parts.push(nullable.to_string());
    }

    let default = format_default(column);
    if !default.is_empty() {
        parts.push(default);
    }

    if inline_primary_key && column.primary_key {
        parts.push("PRIMARY KEY".to_string());
    }

    parts.join(" ")
}

/// Render the column list for a table definition.
///
/// A single primary-key column keeps its inline marker. When more than one
/// column is part of the key, the columns render without markers and a named
/// table-level `PK_<table>` constraint is appended instead.
pub fn generate_columns(columns: &[ColumnDef], table: &str) -> String {
    let pk_columns: Vec<&ColumnDef> = columns.iter().filter(|c| c.primary_key).collect();
    let separate_primary_key = pk_columns.len() > 1;

    let rendered: Vec<String> = columns
        .iter()
        .map(|c| generate_column_inner(c, !separate_primary_key))
        .collect();

    let mut out = rendered.join(", ");

    if separate_primary_key {
        let key_list: Vec<String> = pk_columns
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect();
        out.push_str(&format!(
            ", CONSTRAINT {} PRIMARY KEY ({})",
            quote_constraint_name(&format!("PK_{}", table)),
            key_list.join(", ")
        ));
    }

    out
}

//! Existence probes against the ASE system tables.
//!
//! These are string templates with positional substitution; every
//! migration-supplied name passes through [`escape_literal`] before it lands
//! inside a quoted literal, and empty schema names resolve to the dialect
//! default.
//!
//! [`escape_literal`]: sqlbatch_core::schema::escape_literal

use sqlbatch_core::schema::escape_literal;
use sqlbatch_core::Dialect;

pub fn schema_exists_sql(dialect: &Dialect, schema: &str) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM sysobjects o WHERE user_name(o.uid) = '{}')",
        escape_literal(dialect.schema_or_default(schema))
    )
}

pub fn table_exists_sql(dialect: &Dialect, schema: &str, table: &str) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM sysobjects o WHERE user_name(o.uid) = '{}' AND o.name = '{}')",
        escape_literal(dialect.schema_or_default(schema)),
        escape_literal(table)
    )
}

pub fn column_exists_sql(dialect: &Dialect, schema: &str, table: &str, column: &str) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM sysobjects so \
         INNER JOIN syscolumns sc ON sc.id = so.id \
         INNER JOIN systypes st ON st.usertype = sc.usertype \
         WHERE user_name(so.uid) = '{}' AND so.name = '{}' AND sc.name = '{}')",
        escape_literal(dialect.schema_or_default(schema)),
        escape_literal(table),
        escape_literal(column)
    )
}

pub fn constraint_exists_sql(
    dialect: &Dialect,
    schema: &str,
    table: &str,
    constraint: &str,
) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM sysconstraints c \
         INNER JOIN sysobjects tab ON tab.id = c.tableid \
         WHERE user_name(tab.uid) = '{}' AND tab.name = '{}' AND object_name(c.constrid) = '{}')",
        escape_literal(dialect.schema_or_default(schema)),
        escape_literal(table),
        escape_literal(constraint)
    )
}

/// Checks for an index on a user table; `indid > 0` excludes the table row
/// that sysindexes keeps for the data pages themselves.
pub fn index_exists_sql(dialect: &Dialect, schema: &str, table: &str, index: &str) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM sysindexes idx \
         INNER JOIN sysobjects tab ON tab.id = idx.id \
         WHERE tab.type = 'U' AND idx.indid > 0 AND idx.status & 2 = 2 \
         AND idx.name = '{}' AND user_name(tab.uid) = '{}' AND tab.name = '{}')",
        escape_literal(index),
        escape_literal(dialect.schema_or_default(schema)),
        escape_literal(table)
    )
}

/// Matches a default by searching the stored constraint text, which is how
/// ASE exposes column defaults through syscomments.
pub fn default_value_exists_sql(
    dialect: &Dialect,
    schema: &str,
    table: &str,
    column: &str,
    default_value: &str,
) -> String {
    format!(
        "SELECT 1 WHERE EXISTS (SELECT 1 FROM syscolumns c \
         JOIN sysobjects o ON c.id = o.id \
         LEFT JOIN systypes t ON c.type = t.type AND c.usertype = t.usertype \
         LEFT JOIN syscomments cm ON cm.id = \
         CASE WHEN c.cdefault = 0 THEN c.computedcol ELSE c.cdefault END \
         WHERE o.type = 'U' AND user_name(o.uid) = '{}' AND o.name = '{}' \
         AND c.name = '{}' AND cm.text LIKE '%{}%')",
        escape_literal(dialect.schema_or_default(schema)),
        escape_literal(table),
        escape_literal(column),
        escape_literal(default_value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> Dialect {
        Dialect::sybase_ase()
    }

    #[test]
    fn test_empty_schema_falls_back_to_dbo() {
        let sql = table_exists_sql(&dialect(), "", "orders");
        assert!(sql.contains("user_name(o.uid) = 'dbo'"));
        assert!(sql.contains("o.name = 'orders'"));
    }

    #[test]
    fn test_names_are_escaped() {
        let sql = table_exists_sql(&dialect(), "o'schema", "ord'ers");
        assert!(sql.contains("'o''schema'"));
        assert!(sql.contains("'ord''ers'"));
        assert!(!sql.contains("'o'schema'"));
    }

    #[test]
    fn test_column_exists_names_all_three_objects() {
        let sql = column_exists_sql(&dialect(), "dbo", "orders", "qty");
        assert!(sql.contains("so.name = 'orders'"));
        assert!(sql.contains("sc.name = 'qty'"));
        assert!(sql.contains("INNER JOIN systypes st"));
    }

    #[test]
    fn test_constraint_exists_is_well_formed() {
        let sql = constraint_exists_sql(&dialect(), "dbo", "orders", "PK_orders");
        assert!(sql.contains("FROM sysconstraints c"));
        assert!(!sql.to_lowercase().contains("from from"));
        assert!(sql.contains("object_name(c.constrid) = 'PK_orders'"));
    }

    #[test]
    fn test_index_exists_embeds_the_index_name() {
        let sql = index_exists_sql(&dialect(), "dbo", "orders", "IX_orders_date");
        assert!(sql.contains("idx.name = 'IX_orders_date'"));
        assert!(sql.contains("idx.status & 2 = 2"));
        // Balanced parentheses; the query must be submittable as-is.
        let opens = sql.matches('(').count();
        let closes = sql.matches(')').count();
        assert_eq!(opens, closes);
    }

    #[test]
    fn test_default_value_exists_uses_like_probe() {
        let sql = default_value_exists_sql(&dialect(), "", "orders", "status", "open");
        assert!(sql.contains("cm.text LIKE '%open%'"));
        assert!(sql.contains("user_name(o.uid) = 'dbo'"));
    }

    #[test]
    fn test_all_templates_balance_parentheses() {
        let d = dialect();
        for sql in [
            schema_exists_sql(&d, ""),
            table_exists_sql(&d, "s", "t"),
            column_exists_sql(&d, "s", "t", "c"),
            constraint_exists_sql(&d, "s", "t", "x"),
            index_exists_sql(&d, "s", "t", "i"),
            default_value_exists_sql(&d, "s", "t", "c", "0"),
        ] {
            assert_eq!(sql.matches('(').count(), sql.matches(')').count(), "{sql}");
        }
    }
}

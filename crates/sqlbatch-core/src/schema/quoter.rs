//! Identifier and value quoting for the ASE family.
//!
//! Migration-supplied names end up inside generated DDL and inside the
//! system-table existence queries, so everything that crosses into SQL text
//! goes through one of these functions.

/// Quote an identifier with brackets, doubling any closing bracket.
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Quote a constraint name. Same rules as any other identifier.
pub fn quote_constraint_name(name: &str) -> String {
    quote_identifier(name)
}

/// Escape a string for embedding inside a single-quoted SQL literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quote a default/literal value.
///
/// Numbers and bit values render verbatim so `DEFAULT 0` stays `DEFAULT 0`;
/// anything else becomes a single-quoted string literal.
pub fn quote_value(value: &str) -> String {
    if value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok() {
        return value.to_string();
    }

    match value {
        "true" | "TRUE" => "1".to_string(),
        "false" | "FALSE" => "0".to_string(),
        other => format!("'{}'", escape_literal(other)),
    }
}

use thiserror::Error;

use crate::position::Position;

/// Core error type for sqlbatch operations.
#[derive(Error, Debug)]
pub enum SqlBatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Statement failed at {position}: {message}\nOffending SQL:\n{sql}")]
    Execution {
        /// The database error as reported by the connection.
        message: String,
        /// The batch text that was being executed.
        sql: String,
        /// Where the batch started in the script.
        position: Position,
    },
}

impl SqlBatchError {
    /// Re-attach the offending SQL and its script position to a database
    /// error so callers can reproduce the failing statement.
    pub fn with_sql(self, sql: &str, position: Position) -> Self {
        match self {
            SqlBatchError::Database(message) => SqlBatchError::Execution {
                message,
                sql: sql.to_string(),
                position,
            },
            other => other,
        }
    }
}

/// Result type alias using SqlBatchError.
pub type Result<T> = std::result::Result<T, SqlBatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sql_wraps_database_error() {
        let err = SqlBatchError::Database("table already exists".into());
        let err = err.with_sql("CREATE TABLE t (id INT)", Position::start());

        match err {
            SqlBatchError::Execution { message, sql, position } => {
                assert_eq!(message, "table already exists");
                assert_eq!(sql, "CREATE TABLE t (id INT)");
                assert_eq!(position.line, 1);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_with_sql_leaves_other_variants_alone() {
        let err = SqlBatchError::Config("bad dialect".into());
        let err = err.with_sql("SELECT 1", Position::start());
        assert!(matches!(err, SqlBatchError::Config(_)));
    }

    #[test]
    fn test_execution_display_includes_sql_and_position() {
        let err = SqlBatchError::Execution {
            message: "syntax error".into(),
            sql: "SELEC 1".into(),
            position: Position {
                offset: 10,
                line: 2,
                column: 1,
            },
        };
        let rendered = err.to_string();
        assert!(rendered.contains("line 2, column 1"));
        assert!(rendered.contains("SELEC 1"));
    }
}

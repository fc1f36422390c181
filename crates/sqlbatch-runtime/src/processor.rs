use tokio_util::sync::CancellationToken;
use tracing::info;

use sqlbatch_core::{Dialect, Position, ProcessorOptions, Result};

use crate::connection::ScriptConnection;
use crate::executor::{BatchExecutor, ExecutionReport};
use crate::introspect;
use crate::parser::contains_separator;

/// Everything a [`Processor`] needs, gathered in one place.
pub struct ProcessorConfig<'a> {
    /// Open connection owned by the caller.
    pub connection: &'a mut dyn ScriptConnection,
    pub dialect: Dialect,
    pub options: ProcessorOptions,
    /// Cooperative stop signal, shared with whoever may request a stop.
    pub cancellation: CancellationToken,
}

impl<'a> ProcessorConfig<'a> {
    pub fn new(connection: &'a mut dyn ScriptConnection, dialect: Dialect) -> Self {
        Self {
            connection,
            dialect,
            options: ProcessorOptions::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Dialect-level entry point for running migration SQL.
///
/// Scripts with separator lines go through the batch executor; anything else
/// runs as a single statement. Transaction control is forwarded to the
/// connection and logged, but it is the caller that decides when a
/// transaction starts and how a failure is rolled back.
pub struct Processor<'a> {
    conn: &'a mut dyn ScriptConnection,
    dialect: Dialect,
    options: ProcessorOptions,
    cancellation: CancellationToken,
    in_transaction: bool,
}

impl<'a> Processor<'a> {
    pub fn new(config: ProcessorConfig<'a>) -> Self {
        Self {
            conn: config.connection,
            dialect: config.dialect,
            options: config.options,
            cancellation: config.cancellation,
            in_transaction: false,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Run one migration script.
    pub async fn process(&mut self, sql: &str) -> Result<()> {
        info!("{}", sql);

        if sql.trim().is_empty() {
            return Ok(());
        }

        if contains_separator(&self.dialect, sql) {
            self.execute_batches(sql).await?;
            return Ok(());
        }

        if self.options.preview_only {
            return Ok(());
        }

        self.execute_non_query(sql).await
    }

    /// Run one migration script and return the per-batch report.
    pub async fn process_with_report(&mut self, sql: &str) -> Result<ExecutionReport> {
        info!("{}", sql);
        self.execute_batches(sql).await
    }

    async fn execute_batches(&mut self, sql: &str) -> Result<ExecutionReport> {
        BatchExecutor::new(self.conn, self.options)
            .with_cancellation(self.cancellation.clone())
            .run(&self.dialect, sql)
            .await
    }

    async fn execute_non_query(&mut self, sql: &str) -> Result<()> {
        self.conn
            .execute(sql)
            .await
            .map_err(|e| e.with_sql(sql, Position::start()))?;
        Ok(())
    }

    /// Run a statement through the same preview/batch rules as a script.
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        self.process(sql).await
    }

    /// Run an existence probe. Preview mode answers false without touching
    /// the database.
    pub async fn exists(&mut self, sql: &str) -> Result<bool> {
        if self.options.preview_only {
            return Ok(false);
        }
        self.conn.query_exists(sql).await
    }

    pub async fn begin_transaction(&mut self) -> Result<()> {
        self.conn.begin_transaction().await?;
        self.in_transaction = true;
        info!("BEGIN TRANSACTION");
        Ok(())
    }

    pub async fn commit_transaction(&mut self) -> Result<()> {
        self.conn.commit_transaction().await?;
        self.in_transaction = false;
        info!("COMMIT TRANSACTION");
        Ok(())
    }

    /// Roll back the current transaction. A no-op when none is open.
    pub async fn rollback_transaction(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.conn.rollback_transaction().await?;
        self.in_transaction = false;
        info!("ROLLBACK TRANSACTION");
        Ok(())
    }

    pub async fn schema_exists(&mut self, schema: &str) -> Result<bool> {
        let sql = introspect::schema_exists_sql(&self.dialect, schema);
        self.exists(&sql).await
    }

    pub async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool> {
        let sql = introspect::table_exists_sql(&self.dialect, schema, table);
        self.exists(&sql).await
    }

    pub async fn column_exists(&mut self, schema: &str, table: &str, column: &str) -> Result<bool> {
        let sql = introspect::column_exists_sql(&self.dialect, schema, table, column);
        self.exists(&sql).await
    }

    pub async fn constraint_exists(
        &mut self,
        schema: &str,
        table: &str,
        constraint: &str,
    ) -> Result<bool> {
        let sql = introspect::constraint_exists_sql(&self.dialect, schema, table, constraint);
        self.exists(&sql).await
    }

    pub async fn index_exists(&mut self, schema: &str, table: &str, index: &str) -> Result<bool> {
        let sql = introspect::index_exists_sql(&self.dialect, schema, table, index);
        self.exists(&sql).await
    }

    pub async fn default_value_exists(
        &mut self,
        schema: &str,
        table: &str,
        column: &str,
        default_value: &str,
    ) -> Result<bool> {
        let sql = introspect::default_value_exists_sql(
            &self.dialect,
            schema,
            table,
            column,
            default_value,
        );
        self.exists(&sql).await
    }

    /// ASE has no sequences.
    pub async fn sequence_exists(&mut self, _schema: &str, _sequence: &str) -> Result<bool> {
        Ok(false)
    }
}

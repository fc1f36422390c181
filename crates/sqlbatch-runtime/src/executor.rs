use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sqlbatch_core::{Dialect, Position, ProcessorOptions, Result};

use crate::connection::ScriptConnection;
use crate::parser::{BatchEvent, BatchParser, ParseWarning};

/// Outcome of one batch within a script.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// The batch text as emitted by the parser.
    pub sql: String,
    /// Where the batch started in the script.
    pub position: Position,
    /// Executions asked for by the separator (or 1 for the trailing batch).
    pub requested: u32,
    /// Executions actually performed.
    pub executed: u32,
}

/// Result of running one script.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Per-batch outcomes, in source order.
    pub batches: Vec<BatchOutcome>,
    /// Warnings the parser collected along the way.
    pub warnings: Vec<ParseWarning>,
    /// True when a stop was requested and honoured mid-script.
    pub interrupted: bool,
    /// True when nothing was sent to the database.
    pub preview_only: bool,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl ExecutionReport {
    fn new(started_at: DateTime<Utc>, preview_only: bool) -> Self {
        Self {
            batches: Vec::new(),
            warnings: Vec::new(),
            interrupted: false,
            preview_only,
            started_at,
            elapsed: Duration::ZERO,
        }
    }

    /// Total statement executions across all batches.
    pub fn total_executions(&self) -> u64 {
        self.batches.iter().map(|b| u64::from(b.executed)).sum()
    }
}

/// Runs a script's batches against a connection, in source order.
///
/// The executor drives the parser events directly: a batch is executed the
/// moment its separator arrives, never queued. The connection is borrowed
/// from the caller, which also owns transaction demarcation; the executor
/// assumes it runs inside an already-open transaction or autocommit session.
pub struct BatchExecutor<'a> {
    conn: &'a mut dyn ScriptConnection,
    options: ProcessorOptions,
    cancel: CancellationToken,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(conn: &'a mut dyn ScriptConnection, options: ProcessorOptions) -> Self {
        Self {
            conn,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned stop signal. Checked between repeat
    /// iterations and between batches, never mid-statement.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Parse and execute one script.
    ///
    /// A repeat count of `n` runs the preceding batch `n` times, each as an
    /// independent statement execution. The first database error stops the
    /// remaining repeats and batches and propagates with the offending SQL
    /// attached. In preview mode the parse still runs in full and every
    /// batch is reported; nothing reaches the connection.
    pub async fn run(&mut self, dialect: &Dialect, script: &str) -> Result<ExecutionReport> {
        let started = Instant::now();
        let mut report = ExecutionReport::new(Utc::now(), self.options.preview_only);
        let mut parser = BatchParser::new(dialect, script, self.options.strip_comments);
        let mut held: Option<(String, Position)> = None;

        for event in parser.by_ref() {
            match event {
                BatchEvent::BatchReady { sql, position } => {
                    held = Some((sql, position));
                }
                BatchEvent::Separator { count, .. } => {
                    if let Some((sql, position)) = held.take() {
                        if !self.run_batch(&sql, position, count, &mut report).await? {
                            report.interrupted = true;
                            break;
                        }
                    }
                }
            }
        }

        // Anything left after the last separator runs once.
        if !report.interrupted {
            if let Some((sql, position)) = held.take() {
                if !self.run_batch(&sql, position, 1, &mut report).await? {
                    report.interrupted = true;
                }
            }
        }

        report.warnings = parser.warnings().to_vec();
        report.elapsed = started.elapsed();
        Ok(report)
    }

    /// Execute one batch `count` times. Returns false when a stop request
    /// cut the repeats short.
    async fn run_batch(
        &mut self,
        sql: &str,
        position: Position,
        count: u32,
        report: &mut ExecutionReport,
    ) -> Result<bool> {
        let mut outcome = BatchOutcome {
            sql: sql.to_string(),
            position,
            requested: count,
            executed: 0,
        };

        for iteration in 0..count {
            if self.cancel.is_cancelled() {
                info!("Stop requested; leaving batch at {} after {} of {} executions",
                    position, outcome.executed, count);
                report.batches.push(outcome);
                return Ok(false);
            }

            if self.options.preview_only {
                info!("[preview] batch at {} ({} of {}):\n{}", position, iteration + 1, count, sql);
                continue;
            }

            debug!("Executing batch at {} ({} of {})", position, iteration + 1, count);
            match self.conn.execute(sql).await {
                Ok(affected) => {
                    debug!("Batch affected {} rows", affected);
                    outcome.executed += 1;
                }
                Err(e) => {
                    report.batches.push(outcome);
                    return Err(e.with_sql(sql, position));
                }
            }
        }

        report.batches.push(outcome);
        Ok(true)
    }
}

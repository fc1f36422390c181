use async_trait::async_trait;

use sqlbatch_core::Result;

/// Live database session the processor runs statements against.
///
/// Implementations wrap a real driver connection. The caller owns the
/// session: this crate never opens, closes, or re-creates it, and never runs
/// more than one statement against it at a time. Transaction demarcation is
/// exposed so the surrounding runner can wrap a whole script, but nothing in
/// the executor starts or ends a transaction on its own.
#[async_trait]
pub trait ScriptConnection: Send {
    /// Execute a statement, returning the affected row count.
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Run an existence probe; true when the query returns the scalar 1.
    async fn query_exists(&mut self, sql: &str) -> Result<bool>;

    async fn begin_transaction(&mut self) -> Result<()>;

    async fn commit_transaction(&mut self) -> Result<()>;

    async fn rollback_transaction(&mut self) -> Result<()>;
}

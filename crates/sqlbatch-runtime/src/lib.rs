pub mod connection;
pub mod executor;
pub mod introspect;
pub mod parser;
pub mod processor;

pub use connection::ScriptConnection;
pub use executor::{BatchExecutor, BatchOutcome, ExecutionReport};
pub use parser::{contains_separator, BatchEvent, BatchParser, ParseWarning, TextSource, WarningKind};
pub use processor::{Processor, ProcessorConfig};

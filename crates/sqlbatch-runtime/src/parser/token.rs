use sqlbatch_core::Position;

/// A lexical token recognized ahead of plain text accumulation.
///
/// Text fields carry the original script text, markers and quotes included,
/// so a batch buffer can reproduce the source span it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `-- ...` up to (not including) the end of the line.
    LineComment { text: String, position: Position },

    /// `/* ... */`, or to end of input when the closing marker is missing.
    BlockComment {
        text: String,
        position: Position,
        terminated: bool,
    },

    /// A single-quoted string; doubled quotes inside are content.
    QuotedString { text: String, position: Position },

    /// A batch separator line.
    Separator {
        /// Repeat count for the preceding batch; 1 when absent or unusable.
        count: u32,
        /// A suffix that looked like a repeat count but did not parse as a
        /// positive integer.
        bad_count: Option<String>,
        position: Position,
    },
}

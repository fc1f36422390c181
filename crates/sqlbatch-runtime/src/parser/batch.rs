use std::collections::VecDeque;

use tracing::warn;

use sqlbatch_core::{Dialect, Position};

use super::matchers::{
    BlockCommentMatcher, LineCommentMatcher, QuotedStringMatcher, SeparatorMatcher, TokenMatcher,
};
use super::source::TextSource;
use super::token::Token;

/// Events produced while a script is split into batches.
///
/// The sequence is lazy, finite, and emitted in source order: the batch text
/// accumulated ahead of a separator always arrives before the separator
/// itself, and end of input flushes a trailing batch with no separator after
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Accumulated SQL since the previous separator (or start of input),
    /// trimmed. Never emitted for whitespace- or comment-only spans.
    BatchReady { sql: String, position: Position },

    /// A separator line, carrying the repeat count for the preceding batch.
    Separator { count: u32, position: Position },
}

/// A recoverable oddity found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub position: Position,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A separator suffix that looked like a repeat count but was not a
    /// positive integer; the count fell back to 1.
    InvalidRepeatCount,
    /// A block comment with no closing marker; treated as a comment running
    /// to end of input.
    UnterminatedBlockComment,
}

/// Splits one script into executable batches.
///
/// Each parse starts fresh; nothing carries over between invocations. The
/// parser is an iterator over [`BatchEvent`]s, with recoverable problems
/// collected in [`warnings`] rather than ending the parse.
///
/// [`warnings`]: BatchParser::warnings
pub struct BatchParser {
    source: TextSource,
    separator: SeparatorMatcher,
    strip_comments: bool,
    buffer: String,
    batch_start: Option<Position>,
    has_content: bool,
    pending: VecDeque<BatchEvent>,
    warnings: Vec<ParseWarning>,
    finished: bool,
}

impl BatchParser {
    pub fn new(dialect: &Dialect, script: &str, strip_comments: bool) -> Self {
        Self::from_source(dialect, TextSource::new(script), strip_comments)
    }

    pub fn from_source(dialect: &Dialect, source: TextSource, strip_comments: bool) -> Self {
        Self {
            source,
            separator: SeparatorMatcher::new(dialect.separator_keyword),
            strip_comments,
            buffer: String::new(),
            batch_start: None,
            has_content: false,
            pending: VecDeque::new(),
            warnings: Vec::new(),
            finished: false,
        }
    }

    /// Warnings collected so far. Complete once the iterator is exhausted.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    fn step(&mut self) {
        if self.source.at_end() {
            self.finished = true;
            if let Some(event) = self.take_batch() {
                self.pending.push_back(event);
            }
            return;
        }

        if let Some(Token::QuotedString { text, position }) =
            QuotedStringMatcher.try_match(&mut self.source)
        {
            self.append(&text, position, true);
            return;
        }

        if let Some(Token::LineComment { text, position }) =
            LineCommentMatcher.try_match(&mut self.source)
        {
            if !self.strip_comments {
                self.append(&text, position, false);
            }
            return;
        }

        if let Some(Token::BlockComment {
            text,
            position,
            terminated,
        }) = BlockCommentMatcher.try_match(&mut self.source)
        {
            if !terminated {
                self.warn(
                    WarningKind::UnterminatedBlockComment,
                    position,
                    "block comment is not closed before end of input",
                );
            }
            if !self.strip_comments {
                self.append(&text, position, false);
            }
            return;
        }

        if let Some(Token::Separator {
            count,
            bad_count,
            position,
        }) = self.separator.try_match(&mut self.source)
        {
            if let Some(bad) = bad_count {
                self.warn(
                    WarningKind::InvalidRepeatCount,
                    position,
                    format!("repeat count '{bad}' is not a positive integer; using 1"),
                );
            }
            if let Some(event) = self.take_batch() {
                self.pending.push_back(event);
            }
            self.pending.push_back(BatchEvent::Separator { count, position });
            return;
        }

        let position = self.source.position();
        if let Some(c) = self.source.advance() {
            if !c.is_whitespace() {
                if self.batch_start.is_none() {
                    self.batch_start = Some(position);
                }
                self.has_content = true;
            }
            self.buffer.push(c);
        }
    }

    fn append(&mut self, text: &str, position: Position, is_content: bool) {
        if self.batch_start.is_none() {
            self.batch_start = Some(position);
        }
        if is_content {
            self.has_content = true;
        }
        self.buffer.push_str(text);
    }

    /// Drain the buffer into a batch event, or nothing when the span held
    /// only whitespace and comments.
    fn take_batch(&mut self) -> Option<BatchEvent> {
        let sql = self.buffer.trim().to_string();
        let position = self.batch_start.take().unwrap_or_default();
        let has_content = self.has_content;

        self.buffer.clear();
        self.has_content = false;

        if !has_content || sql.is_empty() {
            return None;
        }

        Some(BatchEvent::BatchReady { sql, position })
    }

    fn warn(&mut self, kind: WarningKind, position: Position, detail: impl Into<String>) {
        let detail = detail.into();
        warn!("Parse warning at {}: {}", position, detail);
        self.warnings.push(ParseWarning {
            kind,
            position,
            detail,
        });
    }
}

impl Iterator for BatchParser {
    type Item = BatchEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            self.step();
        }
    }
}

/// True when the script contains at least one separator outside strings and
/// comments. Lets callers pick single-statement execution for plain scripts.
pub fn contains_separator(dialect: &Dialect, sql: &str) -> bool {
    BatchParser::new(dialect, sql, false).any(|event| matches!(event, BatchEvent::Separator { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(script: &str) -> Vec<BatchEvent> {
        BatchParser::new(&Dialect::sybase_ase(), script, false).collect()
    }

    fn batches(events: &[BatchEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::BatchReady { sql, .. } => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_script_without_separator_is_one_batch() {
        let events = parse("SELECT 1\nSELECT 2");
        assert_eq!(events.len(), 1);
        match &events[0] {
            BatchEvent::BatchReady { sql, position } => {
                assert_eq!(sql, "SELECT 1\nSELECT 2");
                assert_eq!(position.line, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_batches_split_at_separators_with_counts() {
        let events = parse("SELECT 1\nGO\nSELECT 2\nGO 2");

        assert_eq!(events.len(), 4);
        assert!(
            matches!(&events[0], BatchEvent::BatchReady { sql, .. } if sql == "SELECT 1")
        );
        assert!(matches!(&events[1], BatchEvent::Separator { count: 1, .. }));
        assert!(
            matches!(&events[2], BatchEvent::BatchReady { sql, .. } if sql == "SELECT 2")
        );
        assert!(matches!(&events[3], BatchEvent::Separator { count: 2, .. }));
    }

    #[test]
    fn test_trailing_text_flushes_as_final_batch() {
        let events = parse("SELECT 1\nGO\nSELECT 2");
        assert_eq!(batches(&events), vec!["SELECT 1", "SELECT 2"]);
        assert!(matches!(events.last(), Some(BatchEvent::BatchReady { .. })));
    }

    #[test]
    fn test_separator_inside_line_comment_is_text() {
        let events = parse("-- GO\nSELECT 1");
        assert_eq!(events.len(), 1);
        match &events[0] {
            BatchEvent::BatchReady { sql, .. } => assert_eq!(sql, "-- GO\nSELECT 1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_separator_inside_block_comment_is_text() {
        let events = parse("SELECT 1 /*\nGO\n*/ SELECT 2");
        assert_eq!(events.len(), 1);
        assert!(batches(&events)[0].contains("GO"));
    }

    #[test]
    fn test_separator_inside_string_is_text() {
        let events = parse("PRINT 'line one\nGO\nline two'");
        assert_eq!(events.len(), 1);
        assert!(batches(&events)[0].contains("GO"));
    }

    #[test]
    fn test_doubled_quote_does_not_end_string() {
        let events = parse("PRINT 'it''s\nGO\nstill the string'");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_consecutive_separators_emit_no_empty_batches() {
        let events = parse("GO\nGO 4\nSELECT 1");
        assert_eq!(batches(&events), vec!["SELECT 1"]);
        let counts: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Separator { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 4]);
    }

    #[test]
    fn test_comment_only_script_emits_nothing() {
        assert!(parse("-- just notes\n/* and more */\n").is_empty());
    }

    #[test]
    fn test_whitespace_only_script_emits_nothing() {
        assert!(parse("  \n\t \n").is_empty());
    }

    #[test]
    fn test_strip_comments_removes_comment_text() {
        let dialect = Dialect::sybase_ase();
        let script = "SELECT 1 -- trailing\n/* leading */ SELECT 2";
        let events: Vec<BatchEvent> = BatchParser::new(&dialect, script, true).collect();

        assert_eq!(events.len(), 1);
        match &events[0] {
            BatchEvent::BatchReady { sql, .. } => {
                assert!(!sql.contains("trailing"));
                assert!(!sql.contains("leading"));
                assert!(sql.contains("SELECT 1"));
                assert!(sql.contains("SELECT 2"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_comments_kept_by_default() {
        let events = parse("SELECT 1 -- keep me");
        assert_eq!(batches(&events), vec!["SELECT 1 -- keep me"]);
    }

    #[test]
    fn test_malformed_count_warns_and_continues() {
        let dialect = Dialect::sybase_ase();
        let mut parser = BatchParser::new(&dialect, "SELECT 1\nGO 2x\nSELECT 2", false);
        let events: Vec<BatchEvent> = parser.by_ref().collect();

        assert_eq!(batches(&events), vec!["SELECT 1", "SELECT 2"]);
        assert!(matches!(&events[1], BatchEvent::Separator { count: 1, .. }));

        let warnings = parser.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidRepeatCount);
        assert_eq!(warnings[0].position.line, 2);
    }

    #[test]
    fn test_unterminated_block_comment_warns() {
        let dialect = Dialect::sybase_ase();
        let mut parser = BatchParser::new(&dialect, "SELECT 1\n/* never closed", false);
        let events: Vec<BatchEvent> = parser.by_ref().collect();

        assert_eq!(events.len(), 1);
        let warnings = parser.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnterminatedBlockComment);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let script = "SELECT 'a''b' -- note\nGO 2\n/* block */ SELECT 2\nGO";
        let first = parse(script);
        let second = parse(script);
        assert_eq!(first, second);
    }

    #[test]
    fn test_events_reconstruct_script_in_order() {
        let script = "CREATE TABLE t (id INT)\nGO\nINSERT INTO t VALUES (1)\nGO 2\nSELECT * FROM t";
        let events = parse(script);

        let mut rebuilt = String::new();
        for event in &events {
            match event {
                BatchEvent::BatchReady { sql, .. } => {
                    rebuilt.push_str(sql);
                    rebuilt.push('\n');
                }
                BatchEvent::Separator { count, .. } => {
                    rebuilt.push_str(&format!("GO {count}\n"));
                }
            }
        }

        assert_eq!(
            rebuilt.split_whitespace().collect::<Vec<_>>(),
            "CREATE TABLE t (id INT)\nGO 1\nINSERT INTO t VALUES (1)\nGO 2\nSELECT * FROM t"
                .split_whitespace()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_separator_positions_point_at_their_lines() {
        let events = parse("SELECT 1\nGO 3\n");
        match &events[1] {
            BatchEvent::Separator { count, position } => {
                assert_eq!(*count, 3);
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_contains_separator() {
        let dialect = Dialect::sybase_ase();
        assert!(contains_separator(&dialect, "SELECT 1\nGO"));
        assert!(!contains_separator(&dialect, "SELECT 1"));
        assert!(!contains_separator(&dialect, "-- GO\nSELECT 1"));
        assert!(!contains_separator(&dialect, "PRINT 'GO'"));
    }

    #[test]
    fn test_parser_from_reader_source() {
        let dialect = Dialect::sybase_ase();
        let source = TextSource::from_reader("SELECT 1\nGO".as_bytes()).unwrap();
        let events: Vec<BatchEvent> = BatchParser::from_source(&dialect, source, false).collect();
        assert_eq!(events.len(), 2);
    }
}

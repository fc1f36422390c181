//! Streaming batch parser for migration scripts.
//!
//! Splits a script into executable batches at dialect separator lines
//! (`GO`, optionally followed by a repeat count) while ignoring separator
//! text hidden inside quoted strings and comments.

mod batch;
mod matchers;
mod source;
mod token;

pub use batch::{contains_separator, BatchEvent, BatchParser, ParseWarning, WarningKind};
pub use matchers::{
    BlockCommentMatcher, LineCommentMatcher, QuotedStringMatcher, SeparatorMatcher, TokenMatcher,
};
pub use source::TextSource;
pub use token::Token;

use super::source::TextSource;
use super::token::Token;

/// A detector for one lexical class, tried at the current stream point.
///
/// Matchers are checked in a fixed priority order: quoted string, line
/// comment, block comment, separator. A hit consumes the token; a miss
/// consumes nothing.
pub trait TokenMatcher {
    fn try_match(&self, src: &mut TextSource) -> Option<Token>;
}

/// Single-quoted strings. A doubled quote is content, not a terminator; an
/// unterminated string runs to end of input.
pub struct QuotedStringMatcher;

impl TokenMatcher for QuotedStringMatcher {
    fn try_match(&self, src: &mut TextSource) -> Option<Token> {
        if src.peek() != Some('\'') {
            return None;
        }

        let position = src.position();
        let mut text = String::new();
        text.push(src.advance().expect("peeked quote"));

        loop {
            match src.advance() {
                Some('\'') => {
                    text.push('\'');
                    if src.peek() == Some('\'') {
                        text.push(src.advance().expect("peeked quote"));
                    } else {
                        break;
                    }
                }
                Some(c) => text.push(c),
                None => break,
            }
        }

        Some(Token::QuotedString { text, position })
    }
}

/// `--` comments, consumed up to (not including) the end of the line.
pub struct LineCommentMatcher;

impl TokenMatcher for LineCommentMatcher {
    fn try_match(&self, src: &mut TextSource) -> Option<Token> {
        if src.peek() != Some('-') || src.peek_at(1) != Some('-') {
            return None;
        }

        let position = src.position();
        let mut text = String::new();
        while let Some(c) = src.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            src.advance();
        }

        Some(Token::LineComment { text, position })
    }
}

/// `/* */` comments. A missing closing marker consumes the rest of the
/// input and is surfaced through the `terminated` flag instead of failing
/// the parse.
pub struct BlockCommentMatcher;

impl TokenMatcher for BlockCommentMatcher {
    fn try_match(&self, src: &mut TextSource) -> Option<Token> {
        if src.peek() != Some('/') || src.peek_at(1) != Some('*') {
            return None;
        }

        let position = src.position();
        let mut text = String::new();
        text.push(src.advance().expect("peeked slash"));
        text.push(src.advance().expect("peeked star"));

        let mut terminated = false;
        while let Some(c) = src.advance() {
            text.push(c);
            if c == '*' && src.peek() == Some('/') {
                text.push(src.advance().expect("peeked slash"));
                terminated = true;
                break;
            }
        }

        Some(Token::BlockComment {
            text,
            position,
            terminated,
        })
    }
}

/// The dialect separator: a line that is nothing but the keyword
/// (case-insensitive, whitespace allowed around it), optionally followed by a
/// positive integer repeat count.
///
/// Only attempted at the start of a line, so `GO` inside an identifier or in
/// the middle of a statement never matches.
pub struct SeparatorMatcher {
    keyword: &'static str,
}

impl SeparatorMatcher {
    pub fn new(keyword: &'static str) -> Self {
        Self { keyword }
    }
}

impl TokenMatcher for SeparatorMatcher {
    fn try_match(&self, src: &mut TextSource) -> Option<Token> {
        if !src.at_line_start() {
            return None;
        }

        let mut line = String::new();
        let mut len = 0;
        while let Some(c) = src.peek_at(len) {
            if c == '\n' {
                break;
            }
            line.push(c);
            len += 1;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (trimmed, ""),
        };

        if !first.eq_ignore_ascii_case(self.keyword) {
            return None;
        }

        let (count, bad_count) = if rest.is_empty() {
            (1, None)
        } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
            match rest.parse::<u32>() {
                Ok(n) if n > 0 => (n, None),
                // Zero, overflow, or trailing junk: still a separator, but
                // the count falls back to 1.
                _ => (1, Some(rest.to_string())),
            }
        } else {
            // Something like `GO TO ...` is ordinary SQL, not a separator.
            return None;
        };

        let position = src.position();
        for _ in 0..len {
            src.advance();
        }
        if src.peek() == Some('\n') {
            src.advance();
        }

        Some(Token::Separator {
            count,
            bad_count,
            position,
        })
    }
}

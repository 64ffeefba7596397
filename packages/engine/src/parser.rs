//! Error-tolerant JSON parser
//!
//! Parsing is total: every input yields a (possibly absent) spanned root plus
//! parse markers. Nothing here returns an error, because a half-typed
//! document is the normal case in a live editing session. A missing value
//! such as `{"foo": }` parses to a `Missing` hole that suggestions can
//! anchor to, and malformed tokens become markers with the parser skipping
//! ahead.

use crate::node::{Member, Node, NodeValue};
use crate::tokenizer::{tokenize, Token};
use schemapad_common::{Marker, Span};
use std::ops::Range;
use std::str::Chars;

/// Result of one parse: total, never fails
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// The root value; `None` only when the text holds no tokens at all
    pub root: Option<Node>,
    pub markers: Vec<Marker>,
}

pub fn parse(source: &str) -> ParseOutcome {
    let (tokens, invalid) = tokenize(source);

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        markers: Vec::new(),
    };

    for range in invalid {
        parser.markers.push(Marker::error(
            "",
            "Unreadable characters",
            Span::new(range.start, range.end),
        ));
    }

    let root = if parser.tokens.is_empty() {
        None
    } else {
        let root = parser.parse_value();
        if !parser.is_at_end() {
            let start = parser.next_start();
            let end = parser
                .tokens
                .last()
                .map(|(_, range)| range.end)
                .unwrap_or(start);
            parser.markers.push(Marker::error(
                "",
                "Unexpected trailing content",
                Span::new(start, end),
            ));
        }
        Some(root)
    };

    ParseOutcome {
        root,
        markers: parser.markers,
    }
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    markers: Vec<Marker>,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, expected: Token) -> bool {
        if matches!(self.peek(), Some((token, _)) if *token == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// End of the most recently consumed token
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].1.end
        }
    }

    /// Start of the next token, or end of text
    fn next_start(&self) -> usize {
        self.peek()
            .map(|(_, range)| range.start)
            .unwrap_or(self.source.len())
    }

    /// The gap between the previous and the next token
    fn gap(&self) -> Span {
        Span::new(self.prev_end(), self.next_start())
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.markers.push(Marker::error("", message, span));
    }

    fn parse_value(&mut self) -> Node {
        match self.peek().cloned() {
            Some((Token::LBrace, _)) => self.parse_object(),
            Some((Token::LBracket, _)) => self.parse_array(),
            Some((Token::String(slice), range)) => {
                self.advance();
                let span = Span::new(range.start, range.end);
                let text = self.unescape_string(slice, span);
                Node::new(NodeValue::String(text), span)
            }
            Some((Token::Number(slice), range)) => {
                self.advance();
                let value = slice.parse::<f64>().unwrap_or_default();
                Node::new(NodeValue::Number(value), Span::new(range.start, range.end))
            }
            Some((Token::True, range)) => {
                self.advance();
                Node::new(NodeValue::Bool(true), Span::new(range.start, range.end))
            }
            Some((Token::False, range)) => {
                self.advance();
                Node::new(NodeValue::Bool(false), Span::new(range.start, range.end))
            }
            Some((Token::Null, range)) => {
                self.advance();
                Node::new(NodeValue::Null, Span::new(range.start, range.end))
            }
            // A structural token where a value belongs: leave it for the
            // caller and record a hole spanning the gap
            _ => {
                let span = self.gap();
                self.error("Expected a value", span);
                Node::missing(span)
            }
        }
    }

    fn parse_object(&mut self) -> Node {
        let start = self.next_start();
        self.advance(); // {

        let mut members = Vec::new();
        loop {
            match self.peek().cloned() {
                Some((Token::RBrace, _)) => {
                    self.advance();
                    break;
                }
                None => {
                    self.error("Unclosed object", Span::new(start, self.prev_end()));
                    break;
                }
                Some((Token::String(slice), range)) => {
                    self.advance();
                    let key_span = Span::new(range.start, range.end);
                    let key = self.unescape_string(slice, key_span);

                    if !self.match_token(Token::Colon) {
                        let span = self.gap();
                        self.error("Expected ':' after property name", span);
                    }
                    let value = self.parse_value();
                    members.push(Member {
                        key,
                        key_span,
                        value,
                    });

                    match self.peek() {
                        Some((Token::Comma, _)) => {
                            self.advance();
                        }
                        Some((Token::RBrace, _)) | None => {}
                        Some((_, range)) => {
                            let span = Span::new(range.start, range.end);
                            self.error("Expected ',' or '}' after property value", span);
                        }
                    }
                }
                Some((Token::Comma, range)) => {
                    self.advance();
                    self.error(
                        "Expected property name",
                        Span::new(range.start, range.end),
                    );
                }
                Some((token, range)) => {
                    self.advance();
                    self.error(
                        format!("Expected property name, found {}", token),
                        Span::new(range.start, range.end),
                    );
                }
            }
        }

        // An unclosed object may end before a trailing hole; the node span
        // must still cover it so cursor location can reach the hole
        let mut end = self.prev_end();
        if let Some(member) = members.last() {
            end = end.max(member.value.span.end);
        }
        Node::new(NodeValue::Object(members), Span::new(start, end))
    }

    fn parse_array(&mut self) -> Node {
        let start = self.next_start();
        self.advance(); // [

        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some((Token::RBracket, _)) => {
                    self.advance();
                    break;
                }
                None => {
                    self.error("Unclosed array", Span::new(start, self.prev_end()));
                    break;
                }
                _ => {
                    let before = self.pos;
                    items.push(self.parse_value());

                    match self.peek() {
                        Some((Token::Comma, _)) => {
                            self.advance();
                        }
                        Some((Token::RBracket, _)) | None => {}
                        Some((_, range)) => {
                            let span = Span::new(range.start, range.end);
                            self.error("Expected ',' or ']' after array element", span);
                        }
                    }

                    // A hole followed by an unexpected token consumes nothing;
                    // skip one token so the loop always makes progress
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        let mut end = self.prev_end();
        if let Some(item) = items.last() {
            end = end.max(item.span.end);
        }
        Node::new(NodeValue::Array(items), Span::new(start, end))
    }

    /// Decode a string literal (with surrounding quotes). Bad escapes become
    /// markers and a replacement character rather than a failure.
    fn unescape_string(&mut self, slice: &str, span: Span) -> String {
        let inner = &slice[1..slice.len() - 1];
        if !inner.contains('\\') {
            return inner.to_string();
        }

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('b') => out.push('\u{0008}'),
                Some('f') => out.push('\u{000C}'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('u') => self.unescape_unicode(&mut chars, span, &mut out),
                Some(other) => {
                    self.error(format!("Invalid escape '\\{}'", other), span);
                    out.push(other);
                }
                None => {}
            }
        }
        out
    }

    fn unescape_unicode(&mut self, chars: &mut Chars, span: Span, out: &mut String) {
        let Some(high) = read_hex4(chars) else {
            self.error("Invalid \\u escape", span);
            out.push('\u{FFFD}');
            return;
        };

        // Surrogate pairs arrive as two consecutive \uXXXX escapes
        if (0xD800..0xDC00).contains(&high) {
            let mut rest = chars.clone();
            if rest.next() == Some('\\') && rest.next() == Some('u') {
                if let Some(low) = read_hex4(&mut rest) {
                    if (0xDC00..0xE000).contains(&low) {
                        let code =
                            0x10000 + (((high as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            out.push(c);
                            *chars = rest;
                            return;
                        }
                    }
                }
            }
            self.error("Unpaired surrogate in \\u escape", span);
            out.push('\u{FFFD}');
            return;
        }

        match char::from_u32(high as u32) {
            Some(c) => out.push(c),
            None => {
                self.error("Unpaired surrogate in \\u escape", span);
                out.push('\u{FFFD}');
            }
        }
    }
}

fn read_hex4(chars: &mut Chars) -> Option<u16> {
    let mut value: u16 = 0;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)? as u16;
        value = value * 16 + digit;
    }
    Some(value)
}

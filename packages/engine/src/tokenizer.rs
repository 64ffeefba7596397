use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for JSON text
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token<'src> {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    // String literals, including the surrounding quotes
    #[regex(r#""([^"\\\x00-\x1F]|\\.)*""#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
        }
    }
}

/// Tokenize a source string.
///
/// Returns the recognized tokens plus the spans the lexer could not read;
/// the parser turns the latter into markers instead of failing, so
/// tokenizing is total.
pub fn tokenize(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<Range<usize>>) {
    let mut tokens = Vec::new();
    let mut invalid: Vec<Range<usize>> = Vec::new();

    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                // Coalesce runs of unreadable characters into one span
                match invalid.last_mut() {
                    Some(last) if last.end == span.start => last.end = span.end,
                    _ => invalid.push(span),
                }
            }
        }
    }

    (tokens, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_tokens() {
        let (tokens, invalid) = tokenize("{}[]:,");
        assert!(invalid.is_empty());

        let kinds: Vec<_> = tokens.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            kinds,
            vec![
                Token::LBrace,
                Token::RBrace,
                Token::LBracket,
                Token::RBracket,
                Token::Colon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_literals_and_spans() {
        let (tokens, invalid) = tokenize(r#"{"a": 1.5e3, "b": [true, null]}"#);
        assert!(invalid.is_empty());

        assert_eq!(tokens[1].0, Token::String("\"a\""));
        assert_eq!(tokens[1].1, 1..4);
        assert_eq!(tokens[3].0, Token::Number("1.5e3"));
        assert!(tokens.iter().any(|(t, _)| *t == Token::True));
        assert!(tokens.iter().any(|(t, _)| *t == Token::Null));
    }

    #[test]
    fn test_escaped_strings() {
        let (tokens, invalid) = tokenize(r#""he said \"hi\\\" ""#);
        assert!(invalid.is_empty());
        assert!(matches!(tokens[0].0, Token::String(_)));
    }

    #[test]
    fn test_invalid_runs_are_coalesced() {
        let (tokens, invalid) = tokenize("{@@@ }");
        assert_eq!(tokens.len(), 2);
        assert_eq!(invalid, vec![1..4]);
    }

    #[test]
    fn test_negative_and_exponent_numbers() {
        let (tokens, _) = tokenize("-12 0.5 2E+8");
        assert_eq!(tokens[0].0, Token::Number("-12"));
        assert_eq!(tokens[1].0, Token::Number("0.5"));
        assert_eq!(tokens[2].0, Token::Number("2E+8"));
    }
}

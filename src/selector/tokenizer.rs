//! logos-based selector tokenizer.
//!
//! Whitespace is skipped; the parser recovers descendant combinators from
//! the byte spans of adjacent tokens.

use logos::Logos;

use super::SelectorError;

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Double-quoted string literal (attribute values).
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal (attribute values).
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Unsigned integer (unquoted attribute values).
    #[regex(r"[0-9]+")]
    Number,

    /// Identifier: tag names, class names, ids, attribute names.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    /// `.`
    #[token(".")]
    Dot,

    /// `#`
    #[token("#")]
    Hash,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `,`
    #[token(",")]
    Comma,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `=`
    #[token("=")]
    Equals,
}

/// A token with its source text and byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenize a selector string, keeping byte spans for adjacency checks.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, SelectorError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                text: input[span.clone()].to_string(),
                start: span.start,
                end: span.end,
            }),
            Err(()) => {
                return Err(SelectorError::InvalidCharacter {
                    position: span.start,
                    text: input[span].to_string(),
                })
            }
        }
    }
    Ok(tokens)
}

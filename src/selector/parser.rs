//! Recursive descent selector parser.
//!
//! Parses selector text into a [`SelectorList`] using the logos tokenizer
//! from [`super::tokenizer`].

use super::model::*;
use super::tokenizer::{tokenize, Spanned, Token};
use super::SelectorError;

/// Parse a selector list such as `.foo > li, [data-se]`.
pub fn parse_selector(input: &str) -> Result<SelectorList, SelectorError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SelectorError::Empty);
    }
    let mut parser = Parser { tokens, cursor: 0 };
    let list = parser.parse_selector_list()?;
    if let Some(tok) = parser.peek() {
        return Err(SelectorError::UnexpectedToken {
            position: tok.start,
            message: format!("unexpected '{}' after selector", tok.text),
        });
    }
    Ok(list)
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<Spanned, SelectorError> {
        match self.advance() {
            Some(tok) if tok.token == expected => Ok(tok),
            Some(tok) => Err(SelectorError::UnexpectedToken {
                position: tok.start,
                message: format!("expected {what}, got '{}'", tok.text),
            }),
            None => Err(SelectorError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    /// Whether the current token directly follows the previous one (no whitespace).
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        self.peek().is_some_and(|curr| curr.start == prev.end)
    }

    fn parse_selector_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = vec![self.parse_complex()?];
        while self.peek().is_some_and(|t| t.token == Token::Comma) {
            self.advance();
            selectors.push(self.parse_complex()?);
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound()?)];

        loop {
            match self.peek().map(|t| &t.token) {
                Some(Token::GreaterThan) => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound()?));
                }
                // A selector-starting token after whitespace is a descendant
                // combinator; adjacent ones were consumed by parse_compound.
                Some(
                    Token::Ident | Token::Dot | Token::Hash | Token::Star | Token::BracketOpen,
                ) => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        match self.peek().map(|t| t.token.clone()) {
            Some(Token::Ident) => {
                if let Some(tok) = self.advance() {
                    components.push(SelectorComponent::Type(tok.text));
                }
            }
            Some(Token::Star) => {
                self.advance();
                components.push(SelectorComponent::Universal);
            }
            Some(Token::Dot | Token::Hash | Token::BracketOpen) => {
                components.push(self.parse_simple()?);
            }
            Some(_) => {
                let tok = self.advance();
                return Err(SelectorError::UnexpectedToken {
                    position: tok.as_ref().map_or(0, |t| t.start),
                    message: "expected selector".into(),
                });
            }
            None => return Err(SelectorError::UnexpectedEof("expected selector".into())),
        }

        while self.is_adjacent()
            && matches!(
                self.peek().map(|t| &t.token),
                Some(Token::Dot | Token::Hash | Token::BracketOpen)
            )
        {
            components.push(self.parse_simple()?);
        }

        Ok(CompoundSelector { components })
    }

    /// Parse `.class`, `#id`, or `[attr]` / `[attr=value]`.
    fn parse_simple(&mut self) -> Result<SelectorComponent, SelectorError> {
        let Some(lead) = self.advance() else {
            return Err(SelectorError::UnexpectedEof("expected selector".into()));
        };
        match lead.token {
            Token::Dot => {
                let name = self.expect(Token::Ident, "class name after '.'")?;
                Ok(SelectorComponent::Class(name.text))
            }
            Token::Hash => {
                let name = self.expect(Token::Ident, "id after '#'")?;
                Ok(SelectorComponent::Id(name.text))
            }
            Token::BracketOpen => {
                let name = self.expect(Token::Ident, "attribute name")?;
                let mut value = None;
                if self.peek().is_some_and(|t| t.token == Token::Equals) {
                    self.advance();
                    value = Some(self.parse_attribute_value()?);
                }
                self.expect(Token::BracketClose, "']'")?;
                Ok(SelectorComponent::Attribute { name: name.text, value })
            }
            _ => Err(SelectorError::UnexpectedToken {
                position: lead.start,
                message: format!("unexpected '{}'", lead.text),
            }),
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.advance() {
            Some(tok) => match tok.token {
                Token::StringLiteral | Token::StringLiteralSingle => {
                    Ok(tok.text[1..tok.text.len() - 1].to_string())
                }
                Token::Ident | Token::Number => Ok(tok.text),
                _ => Err(SelectorError::UnexpectedToken {
                    position: tok.start,
                    message: format!("expected attribute value, got '{}'", tok.text),
                }),
            },
            None => Err(SelectorError::UnexpectedEof("expected attribute value".into())),
        }
    }
}

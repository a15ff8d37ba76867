//! Recursive-descent parser for the notation grammar

use super::tokens::{tokenize, Token};
use super::{NotationError, NotationNode, RepeatKind};

pub(super) fn parse(source: &str) -> Result<Vec<NotationNode>, NotationError> {
    let tokens = tokenize(source)
        .map_err(|offset| NotationError::new("unrecognized input", offset))?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let nodes = parser.sequence(false)?;
    match parser.peek() {
        None => Ok(nodes),
        Some((_, slice, offset)) => Err(NotationError::new(
            format!("unexpected '{}'", slice),
            offset,
        )),
    }
}

struct Parser<'a> {
    tokens: Vec<(Token, &'a str, usize)>,
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<(Token, &'a str, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<(Token, &'a str, usize)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse until end of input, a closing brace, or (inside alternatives) a pipe
    fn sequence(&mut self, in_alternative: bool) -> Result<Vec<NotationNode>, NotationError> {
        let mut nodes = Vec::new();
        while let Some((token, slice, offset)) = self.peek() {
            let node = match token {
                Token::RightBrace => break,
                Token::Pipe if in_alternative => break,
                Token::Pipe | Token::Atom => {
                    self.bump();
                    NotationNode::Atom(slice.to_string())
                }
                Token::Escaped => {
                    self.bump();
                    NotationNode::Atom(slice[1..].to_string())
                }
                Token::Hole => {
                    self.bump();
                    NotationNode::Hole(slice[1..].to_string())
                }
                Token::Whitespace => {
                    self.bump();
                    NotationNode::Whitespace
                }
                Token::RepeatPlus | Token::RepeatStar => self.repeat(token, slice, offset)?,
                Token::Optional => {
                    self.bump();
                    let body = self.group_body(slice, offset)?;
                    NotationNode::Optional(body)
                }
                Token::Alternative => self.alternative(slice, offset)?,
                Token::LeftBrace => {
                    self.bump();
                    let body = self.group_body(slice, offset)?;
                    NotationNode::Curlies(body)
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn repeat(
        &mut self,
        opener: Token,
        slice: &str,
        offset: usize,
    ) -> Result<NotationNode, NotationError> {
        self.bump();
        let separator = match self.peek() {
            Some((Token::Atom | Token::Pipe, sep, _)) => {
                self.bump();
                Some(sep.to_string())
            }
            Some((Token::Escaped, sep, _)) => {
                self.bump();
                Some(sep[1..].to_string())
            }
            _ => None,
        };
        let body = self.group_body(slice, offset)?;
        let kind = if opener == Token::RepeatPlus {
            RepeatKind::OneOrMore
        } else {
            RepeatKind::ZeroOrMore
        };
        Ok(NotationNode::Repeat {
            kind,
            separator,
            body,
        })
    }

    fn alternative(&mut self, slice: &str, offset: usize) -> Result<NotationNode, NotationError> {
        self.bump();
        let mut branches = Vec::new();
        loop {
            branches.push(trim(self.sequence(true)?));
            match self.peek() {
                Some((Token::Pipe, _, _)) => {
                    self.bump();
                }
                _ => break,
            }
        }
        self.close(slice, offset)?;
        Ok(NotationNode::Alternative(branches))
    }

    fn group_body(
        &mut self,
        opener: &str,
        offset: usize,
    ) -> Result<Vec<NotationNode>, NotationError> {
        let body = self.sequence(false)?;
        self.close(opener, offset)?;
        Ok(trim(body))
    }

    fn close(&mut self, opener: &str, offset: usize) -> Result<(), NotationError> {
        match self.bump() {
            Some((Token::RightBrace, _, _)) => Ok(()),
            _ => Err(NotationError::new(
                format!("unclosed '{}' group", opener),
                offset.min(self.end),
            )),
        }
    }
}

/// Whitespace right inside group delimiters is not significant
fn trim(mut nodes: Vec<NotationNode>) -> Vec<NotationNode> {
    while nodes.last() == Some(&NotationNode::Whitespace) {
        nodes.pop();
    }
    let leading = nodes
        .iter()
        .take_while(|node| **node == NotationNode::Whitespace)
        .count();
    nodes.drain(..leading);
    nodes
}

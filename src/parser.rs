use std::mem;

use thiserror::Error;

use crate::{
    ast::{LogicalOp, Node, Token},
    lexer::{LexError, Lexer, Position},
};

/// Deepest tree, and deepest parenthesis nesting, a filter may produce.
///
/// A chain of `n` comparisons joined by connectors of one precedence is `n`
/// levels deep.
pub const MAX_DEPTH: usize = 512;

/// Errors raised while building a [`Node`] tree from a query string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected} at {position}, got {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: Position,
    },

    #[error("empty filter expression")]
    Empty,

    #[error("filter nests deeper than {} levels at {position}", MAX_DEPTH)]
    TooDeep { position: Position },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    token_start: Position,
    nesting: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let token_start = lexer.position();
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            token_start,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.token_start = self.lexer.position();
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: describe(&self.current_token),
            position: self.token_start,
        }
    }

    /// Parse a comparison or a parenthesized group, with the depth of the result
    fn parse_primary(&mut self) -> Result<(Node, usize), ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::LParen => {
                if self.nesting == MAX_DEPTH {
                    return Err(ParseError::TooDeep {
                        position: self.token_start,
                    });
                }
                self.nesting += 1;
                self.advance()?;
                let parsed = self.parse_or()?;
                if self.current_token != Token::RParen {
                    return Err(self.unexpected("')'"));
                }
                self.advance()?;
                self.nesting -= 1;
                Ok(parsed)
            }
            Token::Selector(selector) => {
                self.advance()?;
                let op = match self.current_token {
                    Token::Comparison(op) => op,
                    _ => return Err(self.unexpected("a comparison operator")),
                };
                self.advance()?;
                let argument = match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::Argument(literal) => literal,
                    token => {
                        self.current_token = token;
                        return Err(self.unexpected("an argument"));
                    }
                };
                self.advance()?;
                Ok((Node::comparison(selector, op, argument), 1))
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("a selector or '('"))
            }
        }
    }

    fn parse_and(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut left, mut depth) = self.parse_primary()?;

        while let Token::Logical(op @ (LogicalOp::And | LogicalOp::Nand)) = self.current_token {
            let position = self.token_start;
            self.advance()?;
            let (right, right_depth) = self.parse_primary()?;
            depth = join_depth(depth, right_depth, position)?;
            left = Node::logical(op, left, right);
        }
        Ok((left, depth))
    }

    fn parse_or(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut left, mut depth) = self.parse_and()?;

        while let Token::Logical(op @ (LogicalOp::Or | LogicalOp::Nor)) = self.current_token {
            let position = self.token_start;
            self.advance()?;
            let (right, right_depth) = self.parse_and()?;
            depth = join_depth(depth, right_depth, position)?;
            left = Node::logical(op, left, right);
        }
        Ok((left, depth))
    }

    /// Parse a complete filter expression
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        if self.current_token == Token::Eof {
            return Err(ParseError::Empty);
        }
        let (node, _) = self.parse_or()?;
        if self.current_token != Token::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(node)
    }
}

/// Parse a filter string into a [`Node`] tree.
///
/// # Examples
///
/// ```
/// use fiql_predicate::{parse, Node};
///
/// let node = parse("name=='Chuck',owner.firstName=='Jeff'").unwrap();
/// assert!(matches!(node, Node::Logical { .. }));
/// ```
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

fn join_depth(left: usize, right: usize, position: Position) -> Result<usize, ParseError> {
    let depth = 1 + left.max(right);
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeep { position });
    }
    Ok(depth)
}

fn describe(token: &Token) -> String {
    match token {
        Token::Selector(s) => format!("selector '{}'", s),
        Token::Comparison(op) => format!("operator '{}'", op),
        Token::Argument(literal) => format!("argument {}", literal),
        Token::Logical(op) => format!("connector '{}'", op),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

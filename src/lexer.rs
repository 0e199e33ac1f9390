use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::ast::{ComparisonOp, Literal, LogicalOp, Token, TypeSuffix};

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?")
        .expect("date-time pattern")
});

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date pattern"));

// A '.' only belongs to the number when a digit follows, so `2.name==x` stays a nand.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)(?P<suffix>[lLdD])?")
        .expect("number pattern")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_*][A-Za-z0-9_*\-]*").expect("word pattern"));

const OPERATORS: [(&str, ComparisonOp); 6] = [
    ("==", ComparisonOp::Equal),
    ("!=", ComparisonOp::NotEqual),
    ("=gt=", ComparisonOp::GreaterThan),
    ("=lt=", ComparisonOp::LessThan),
    ("=ge=", ComparisonOp::GreaterEqual),
    ("=le=", ComparisonOp::LessEqual),
];

/// Byte offset into the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.0)
    }
}

/// Errors raised while splitting a query into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}, expected {expected}")]
    UnexpectedCharacter {
        ch: char,
        position: Position,
        expected: &'static str,
    },

    #[error("expected a comparison operator (==, !=, =gt=, =lt=, =ge=, =le=) at {0}")]
    ExpectedOperator(Position),

    #[error("unrecognized argument at {0}")]
    InvalidArgument(Position),

    #[error("unterminated string starting at {0}")]
    UnterminatedString(Position),

    #[error("invalid escape sequence '\\{ch}' at {position}")]
    InvalidEscape { ch: char, position: Position },
}

/// What the lexer expects next. FIQL tokens are position dependent: a `.`
/// separates path segments inside a selector but is the nand connector
/// after an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Selector,
    Operator,
    Argument,
    Connector,
}

pub struct Lexer {
    input: String,
    position: usize,
    mode: Mode,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.to_string(),
            position: 0,
            mode: Mode::Selector,
        }
    }

    pub fn position(&self) -> Position {
        Position(self.position)
    }

    fn rest(&self) -> &str {
        &self.input[self.position..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_selector(&mut self) -> String {
        let mut selector = self.read_identifier();
        while self.current_char() == Some('.') && self.peek_char(1).is_some_and(is_identifier_start) {
            self.advance();
            selector.push('.');
            selector.push_str(&self.read_identifier());
        }
        selector
    }

    fn read_operator(&mut self) -> Result<ComparisonOp, LexError> {
        let start = self.position();
        for (symbol, op) in OPERATORS {
            if self.rest().starts_with(symbol) {
                self.position += symbol.len();
                return Ok(op);
            }
        }
        Err(LexError::ExpectedOperator(start))
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position();
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some(c @ ('\'' | '"' | '\\')) => result.push(c),
                        Some(c) => {
                            return Err(LexError::InvalidEscape {
                                ch: c,
                                position: self.position(),
                            });
                        }
                        None => return Err(LexError::UnterminatedString(start)),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString(start))
    }

    fn read_argument(&mut self) -> Result<Literal, LexError> {
        if let Some(quote @ ('\'' | '"')) = self.current_char() {
            return self.read_string(quote).map(Literal::string);
        }

        let start = self.position();
        if let Some(m) = DATE_TIME.find(self.rest()).or_else(|| DATE.find(self.rest())) {
            let text = m.as_str().to_string();
            self.position += text.len();
            return Ok(Literal::bare(text));
        }

        if let Some(caps) = NUMBER.captures(self.rest()) {
            let consumed = caps.get(0).map_or(0, |m| m.end());
            let mut literal = Literal::bare(&caps["number"]);
            if let Some(suffix) = caps
                .name("suffix")
                .and_then(|s| s.as_str().chars().next())
                .and_then(TypeSuffix::from_char)
            {
                literal = literal.with_suffix(suffix);
            }
            self.position += consumed;
            return Ok(literal);
        }

        if let Some(m) = WORD.find(self.rest()) {
            let text = m.as_str().to_string();
            self.position += text.len();
            return Ok(Literal::bare(text));
        }

        Err(LexError::InvalidArgument(start))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(Token::Eof);
        };

        match self.mode {
            Mode::Selector => match ch {
                '(' => {
                    self.advance();
                    Ok(Token::LParen)
                }
                c if is_identifier_start(c) => {
                    let selector = self.read_selector();
                    self.mode = Mode::Operator;
                    Ok(Token::Selector(selector))
                }
                c => Err(LexError::UnexpectedCharacter {
                    ch: c,
                    position: self.position(),
                    expected: "a selector or '('",
                }),
            },
            Mode::Operator => {
                let op = self.read_operator()?;
                self.mode = Mode::Argument;
                Ok(Token::Comparison(op))
            }
            Mode::Argument => {
                let literal = self.read_argument()?;
                self.mode = Mode::Connector;
                Ok(Token::Argument(literal))
            }
            Mode::Connector => {
                let op = match ch {
                    ')' => {
                        self.advance();
                        return Ok(Token::RParen);
                    }
                    ',' => LogicalOp::And,
                    ';' => LogicalOp::Or,
                    '.' => LogicalOp::Nand,
                    ':' => LogicalOp::Nor,
                    c => {
                        return Err(LexError::UnexpectedCharacter {
                            ch: c,
                            position: self.position(),
                            expected: "a connector (, ; . :) or ')'",
                        });
                    }
                };
                self.advance();
                self.mode = Mode::Selector;
                Ok(Token::Logical(op))
            }
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[test]
fn test_nand_after_quoted_argument() {
    let mut lexer = Lexer::new("name!='Chuck'.owner.firstName!='Jeff'");
    assert_eq!(lexer.next_token(), Ok(Token::Selector("name".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Comparison(ComparisonOp::NotEqual)));
    assert_eq!(lexer.next_token(), Ok(Token::Argument(Literal::string("Chuck"))));
    assert_eq!(lexer.next_token(), Ok(Token::Logical(LogicalOp::Nand)));
    assert_eq!(lexer.next_token(), Ok(Token::Selector("owner.firstName".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Comparison(ComparisonOp::NotEqual)));
    assert_eq!(lexer.next_token(), Ok(Token::Argument(Literal::string("Jeff"))));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_long_suffix() {
    let mut lexer = Lexer::new("visits=ge=2L");
    assert_eq!(lexer.next_token(), Ok(Token::Selector("visits".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Comparison(ComparisonOp::GreaterEqual)));
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Argument(Literal::bare("2").with_suffix(TypeSuffix::Long)))
    );
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

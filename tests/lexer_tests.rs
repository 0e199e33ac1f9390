// tests/lexer_tests.rs

use fiql_predicate::ast::{ComparisonOp, Literal, LogicalOp, Token, TypeSuffix};
use fiql_predicate::lexer::{LexError, Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return tokens;
        }
        tokens.push(token);
    }
}

fn first_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(Token::Eof) => panic!("no error for input: {}", input),
            Ok(_) => {}
            Err(e) => return e,
        }
    }
}

fn selector(name: &str) -> Token {
    Token::Selector(name.to_string())
}

// ============================================================================
// Operators and connectors
// ============================================================================

#[test]
fn test_comparison_operators() {
    let test_cases = vec![
        ("==", ComparisonOp::Equal),
        ("!=", ComparisonOp::NotEqual),
        ("=gt=", ComparisonOp::GreaterThan),
        ("=lt=", ComparisonOp::LessThan),
        ("=ge=", ComparisonOp::GreaterEqual),
        ("=le=", ComparisonOp::LessEqual),
    ];

    for (symbol, op) in test_cases {
        let input = format!("visits{}2", symbol);
        assert_eq!(
            tokens(&input),
            vec![selector("visits"), Token::Comparison(op), Token::Argument(Literal::bare("2"))],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_connectors() {
    let test_cases = vec![
        (',', LogicalOp::And),
        (';', LogicalOp::Or),
        ('.', LogicalOp::Nand),
        (':', LogicalOp::Nor),
    ];

    for (symbol, op) in test_cases {
        let input = format!("name=='Max'{}name=='Leo'", symbol);
        let tokens = tokens(&input);
        assert_eq!(tokens.len(), 7, "Failed for input: {}", input);
        assert_eq!(tokens[3], Token::Logical(op));
    }
}

#[test]
fn test_parentheses() {
    assert_eq!(
        tokens("(name=='Max';name=='Leo'),visits=ge=2"),
        vec![
            Token::LParen,
            selector("name"),
            Token::Comparison(ComparisonOp::Equal),
            Token::Argument(Literal::string("Max")),
            Token::Logical(LogicalOp::Or),
            selector("name"),
            Token::Comparison(ComparisonOp::Equal),
            Token::Argument(Literal::string("Leo")),
            Token::RParen,
            Token::Logical(LogicalOp::And),
            selector("visits"),
            Token::Comparison(ComparisonOp::GreaterEqual),
            Token::Argument(Literal::bare("2")),
        ]
    );
}

#[test]
fn test_whitespace_between_tokens() {
    assert_eq!(
        tokens("  name == 'Lucky Lou' ,  visits =ge= 2 "),
        vec![
            selector("name"),
            Token::Comparison(ComparisonOp::Equal),
            Token::Argument(Literal::string("Lucky Lou")),
            Token::Logical(LogicalOp::And),
            selector("visits"),
            Token::Comparison(ComparisonOp::GreaterEqual),
            Token::Argument(Literal::bare("2")),
        ]
    );
}

// ============================================================================
// Selectors
// ============================================================================

#[test]
fn test_nested_selector() {
    assert_eq!(tokens("owner.firstName=='Jeff'")[0], selector("owner.firstName"));
    assert_eq!(tokens("visits.type==DONE")[0], selector("visits.type"));
}

#[test]
fn test_dot_after_argument_is_nand() {
    assert_eq!(
        tokens("visits=ge=2.name=='Max'"),
        vec![
            selector("visits"),
            Token::Comparison(ComparisonOp::GreaterEqual),
            Token::Argument(Literal::bare("2")),
            Token::Logical(LogicalOp::Nand),
            selector("name"),
            Token::Comparison(ComparisonOp::Equal),
            Token::Argument(Literal::string("Max")),
        ]
    );
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_quoted_arguments() {
    assert_eq!(tokens("name=='Max'")[2], Token::Argument(Literal::string("Max")));
    assert_eq!(tokens("name==\"Max\"")[2], Token::Argument(Literal::string("Max")));
    assert_eq!(tokens(r"name=='O\'Brien'")[2], Token::Argument(Literal::string("O'Brien")));
    assert_eq!(tokens(r"name=='a\\b'")[2], Token::Argument(Literal::string(r"a\b")));
    assert_eq!(tokens("name==''")[2], Token::Argument(Literal::string("")));
}

#[test]
fn test_date_arguments() {
    assert_eq!(
        tokens("birthDate=gt=2012-08-31")[2],
        Token::Argument(Literal::bare("2012-08-31"))
    );
    assert_eq!(
        tokens("visits.date==2013-01-04T09:15:00.000+00:00")[2],
        Token::Argument(Literal::bare("2013-01-04T09:15:00.000+00:00"))
    );
    assert_eq!(
        tokens("visits.date=lt=2013-01-04T09:15Z")[2],
        Token::Argument(Literal::bare("2013-01-04T09:15Z"))
    );
}

#[test]
fn test_number_arguments() {
    let test_cases = vec![
        ("2", Literal::bare("2")),
        ("-7", Literal::bare("-7")),
        ("2.5", Literal::bare("2.5")),
        ("1e3", Literal::bare("1e3")),
        ("2L", Literal::bare("2").with_suffix(TypeSuffix::Long)),
        ("2l", Literal::bare("2").with_suffix(TypeSuffix::Long)),
        ("2.5D", Literal::bare("2.5").with_suffix(TypeSuffix::Double)),
    ];

    for (argument, expected) in test_cases {
        let input = format!("weight=={}", argument);
        assert_eq!(tokens(&input)[2], Token::Argument(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_bare_word_arguments() {
    assert_eq!(tokens("visits.type==SCHEDULED")[2], Token::Argument(Literal::bare("SCHEDULED")));
    assert_eq!(tokens("vaccinated==true")[2], Token::Argument(Literal::bare("true")));
    assert_eq!(tokens("name==*uck*")[2], Token::Argument(Literal::bare("*uck*")));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_operator() {
    assert_eq!(first_error("name~'Max'"), LexError::ExpectedOperator(Position(4)));
    assert_eq!(first_error("name=eq='Max'"), LexError::ExpectedOperator(Position(4)));
}

#[test]
fn test_unterminated_string() {
    assert_eq!(first_error("name=='Max"), LexError::UnterminatedString(Position(6)));
}

#[test]
fn test_invalid_escape() {
    assert_eq!(
        first_error(r"name=='a\n'"),
        LexError::InvalidEscape {
            ch: 'n',
            position: Position(9)
        }
    );
}

#[test]
fn test_invalid_argument() {
    assert_eq!(first_error("name==@home"), LexError::InvalidArgument(Position(6)));
}

#[test]
fn test_unexpected_characters() {
    assert!(matches!(
        first_error("name=='Max'&name=='Leo'"),
        LexError::UnexpectedCharacter {
            ch: '&',
            position: Position(11),
            ..
        }
    ));
    assert!(matches!(
        first_error(",name=='Max'"),
        LexError::UnexpectedCharacter { ch: ',', position: Position(0), .. }
    ));
}

#[test]
fn test_position_tracks_consumed_input() {
    let mut lexer = Lexer::new("name=='Max'");
    assert_eq!(lexer.position(), Position(0));
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), Position(4));
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), Position(6));
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), Position(11));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

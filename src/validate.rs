//! Grammar-conformance checks over single tokens.
//!
//! Each check is a pure predicate: it looks at one token and either
//! returns the useful payload or a [`SyntaxError`] carrying the expected
//! construct and the actual token. The parser decides *which* check to
//! run; the checks themselves hold no state.
use crate::{
    error::{CompileResult, SemanticError, SyntaxError},
    tokens::{Keyword, Sym, Token, TokenKind},
};

use smol_str::SmolStr;

pub const INTEGER_MIN: u16 = 0;
pub const INTEGER_MAX: u16 = 32767;

/// Binary operators, in the closed set the expression grammar accepts.
pub const OPERATORS: [Sym; 9] = [
    Sym::Plus,
    Sym::Minus,
    Sym::Star,
    Sym::Slash,
    Sym::Amp,
    Sym::Pipe,
    Sym::Lt,
    Sym::Gt,
    Sym::Eq,
];

pub const UNARY_OPERATORS: [Sym; 2] = [Sym::Minus, Sym::Tilde];

pub const KEYWORD_CONSTANTS: [Keyword; 4] = [Keyword::True, Keyword::False, Keyword::Null, Keyword::This];

/// Built-in value types. A class name identifier is also a valid type.
pub const TYPES: [Keyword; 3] = [Keyword::Int, Keyword::Char, Keyword::Boolean];

fn mismatch(expected: impl Into<String>, token: &Token) -> SyntaxError {
    SyntaxError {
        expected: expected.into(),
        found: token.to_string(),
        line: token.line,
    }
}

pub fn expect_keyword(token: &Token, keyword: Keyword) -> Result<(), SyntaxError> {
    match token.kind {
        TokenKind::Keyword(k) if k == keyword => Ok(()),
        _ => Err(mismatch(format!("keyword \"{}\"", keyword), token)),
    }
}

pub fn expect_one_of_keywords(token: &Token, keywords: &[Keyword]) -> Result<Keyword, SyntaxError> {
    match token.kind {
        TokenKind::Keyword(k) if keywords.contains(&k) => Ok(k),
        _ => {
            let list = keywords
                .iter()
                .map(|k| format!("\"{}\"", k))
                .collect::<Vec<_>>()
                .join(", ");
            Err(mismatch(format!("keyword {}", list), token))
        }
    }
}

pub fn expect_symbol(token: &Token, sym: Sym) -> Result<(), SyntaxError> {
    match token.kind {
        TokenKind::Sym(s) if s == sym => Ok(()),
        _ => Err(mismatch(format!("symbol \"{}\"", sym), token)),
    }
}

pub fn expect_one_of_symbols(token: &Token, symbols: &[Sym]) -> Result<Sym, SyntaxError> {
    match token.kind {
        TokenKind::Sym(s) if symbols.contains(&s) => Ok(s),
        _ => {
            let list = symbols
                .iter()
                .map(|s| format!("\"{}\"", s))
                .collect::<Vec<_>>()
                .join(", ");
            Err(mismatch(format!("symbol {}", list), token))
        }
    }
}

pub fn expect_identifier(token: &Token) -> Result<SmolStr, SyntaxError> {
    match token.kind {
        TokenKind::Ident => Ok(token.text.clone()),
        _ => Err(mismatch("identifier", token)),
    }
}

/// A type position accepts `int`, `char`, `boolean` or a class name.
pub fn expect_type(token: &Token) -> Result<SmolStr, SyntaxError> {
    match token.kind {
        TokenKind::Keyword(k) if TYPES.contains(&k) => Ok(token.text.clone()),
        TokenKind::Ident => Ok(token.text.clone()),
        _ => Err(mismatch(
            "keyword \"int\", \"char\", \"boolean\" or class name identifier",
            token,
        )),
    }
}

/// A return type position additionally accepts `void`.
pub fn expect_return_type(token: &Token) -> Result<SmolStr, SyntaxError> {
    match token.kind {
        TokenKind::Keyword(Keyword::Void) => Ok(token.text.clone()),
        _ => expect_type(token).map_err(|_| {
            mismatch(
                "keyword \"int\", \"char\", \"boolean\", \"void\" or class name identifier",
                token,
            )
        }),
    }
}

/// Parse and range check an integer literal. The range check happens here,
/// at consumption time, not in the lexer.
pub fn expect_integer(token: &Token) -> CompileResult<u16> {
    if token.kind != TokenKind::Int {
        return Err(mismatch(
            format!("integer between {} and {}", INTEGER_MIN, INTEGER_MAX),
            token,
        )
        .into());
    }

    match token.text.parse::<u32>() {
        Ok(value) if value <= INTEGER_MAX as u32 => Ok(value as u16),
        _ => Err(SemanticError::IntegerOutOfRange {
            value: token.text.to_string(),
            line: token.line,
        }
        .into()),
    }
}

/// Probe for a binary operator. Absence is not an error here: it is how
/// the expression loop knows the expression ended.
pub fn binary_operator(token: &Token) -> Option<Sym> {
    match token.kind {
        TokenKind::Sym(s) if OPERATORS.contains(&s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{CompileError, SemanticError};

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 7)
    }

    #[test]
    fn test_expect_keyword_mismatch_detail() {
        let tok = token(TokenKind::Ident, "klass");
        let err = expect_keyword(&tok, Keyword::Class).unwrap_err();

        assert_eq!(err.expected, "keyword \"class\"");
        assert_eq!(err.found, "identifier 'klass'");
        assert_eq!(err.line, 7);
    }

    #[test]
    fn test_expect_type_accepts_class_names() {
        assert!(expect_type(&token(TokenKind::Keyword(Keyword::Int), "int")).is_ok());
        assert!(expect_type(&token(TokenKind::Ident, "Point")).is_ok());
        assert!(expect_type(&token(TokenKind::Keyword(Keyword::Void), "void")).is_err());
        assert!(expect_return_type(&token(TokenKind::Keyword(Keyword::Void), "void")).is_ok());
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(expect_integer(&token(TokenKind::Int, "0")).unwrap(), 0);
        assert_eq!(expect_integer(&token(TokenKind::Int, "32767")).unwrap(), 32767);

        let err = expect_integer(&token(TokenKind::Int, "32768")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::IntegerOutOfRange { .. })
        ));
    }

    #[test]
    fn test_operator_classification() {
        assert_eq!(binary_operator(&token(TokenKind::Sym(Sym::Star), "*")), Some(Sym::Star));
        assert_eq!(binary_operator(&token(TokenKind::Sym(Sym::Tilde), "~")), None);
        assert_eq!(binary_operator(&token(TokenKind::Int, "5")), None);

        let unary = token(TokenKind::Sym(Sym::Minus), "-");
        assert!(expect_one_of_symbols(&unary, &UNARY_OPERATORS).is_ok());
        assert!(expect_one_of_symbols(&token(TokenKind::Sym(Sym::Plus), "+"), &UNARY_OPERATORS).is_err());
    }
}

//! Result and errors.
//!
//! Every stage reports through [`CompileError`]. An error is fatal to the
//! compilation unit that raised it: there is no recovery and no partial
//! output. Units are independent, so a failed unit leaves others untouched.
use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;

pub type CompileResult<T> = std::result::Result<T, CompileError>;

#[derive(Debug)]
pub enum CompileError {
    Lex(LexicalError),
    Syntax(SyntaxError),
    Semantic(SemanticError),
    /// Generator found a structurally malformed tree node. Indicates a
    /// defect in the parser/generator contract, not a problem with the
    /// source being compiled.
    Internal(&'static str),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => Display::fmt(err, f),
            Self::Syntax(err) => Display::fmt(err, f),
            Self::Semantic(err) => Display::fmt(err, f),
            Self::Internal(msg) => write!(f, "internal compiler error: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexicalError> for CompileError {
    fn from(err: LexicalError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Syntax(err)
    }
}

impl From<SemanticError> for CompileError {
    fn from(err: SemanticError) -> Self {
        CompileError::Semantic(err)
    }
}

/// Malformed raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    UnknownCharacter { character: char, line: u32 },
    /// String literals must close on the line they open.
    UnterminatedString { line: u32 },
    /// A `/*` comment still open at end of input.
    UnterminatedComment { line: u32 },
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter { character, line } => {
                write!(f, "line {}: unknown character {:?}", line, character)
            }
            Self::UnterminatedString { line } => {
                write!(f, "line {}: string literal is not terminated", line)
            }
            Self::UnterminatedComment { line } => {
                write!(f, "line {}: block comment is not terminated", line)
            }
        }
    }
}

impl std::error::Error for LexicalError {}

/// The token stream did not match the grammar.
///
/// Carries the expected construct and the actual token so the message can
/// show both sides of the mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub line: u32,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} expected, got {} instead",
            self.line, self.expected, self.found
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Grammatically well-formed source that still cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Name already present in the same scope table.
    DuplicateSymbol { name: SmolStr, line: u32 },
    /// A class may declare at most one constructor.
    DuplicateConstructor { class: SmolStr },
    IntegerOutOfRange { value: String, line: u32 },
    /// Identifier used as a variable but found in neither scope table.
    UndeclaredVariable { name: SmolStr, line: u32 },
    MissingReturnValue { subroutine: SmolStr, line: u32 },
    UnexpectedReturnValue { subroutine: SmolStr, line: u32 },
}

impl Display for SemanticError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSymbol { name, line } => {
                write!(f, "line {}: duplicate variable identifier '{}'", line, name)
            }
            Self::DuplicateConstructor { class } => {
                write!(f, "class {} already declares a constructor", class)
            }
            Self::IntegerOutOfRange { value, line } => {
                write!(f, "line {}: integer literal {} is out of range", line, value)
            }
            Self::UndeclaredVariable { name, line } => {
                write!(f, "line {}: variable '{}' is not declared", line, name)
            }
            Self::MissingReturnValue { subroutine, line } => {
                write!(f, "line {}: subroutine {} must return a value", line, subroutine)
            }
            Self::UnexpectedReturnValue { subroutine, line } => {
                write!(f, "line {}: void subroutine {} cannot return a value", line, subroutine)
            }
        }
    }
}

impl std::error::Error for SemanticError {}

//! Crate-level error type

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use thiserror::Error;

/// Any failure from source text to finished run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordsError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl WordsError {
    pub fn location(&self) -> SourceLocation {
        match self {
            WordsError::Lex(err) => err.location(),
            WordsError::Parse(err) => err.location,
            WordsError::Runtime(err) => err.location(),
        }
    }
}

//! Runtime error types for the Words interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lex or parse errors).
//!
//! All runtime errors are fatal: they halt execution and carry the location of
//! the statement that failed.

use crate::memory::dictionary::DictionaryError;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Not enough values on the active stack
    #[error("Stack underflow at {location}: needed {needed} value(s), found {available}")]
    StackUnderflow {
        needed: usize,
        available: usize,
        location: SourceLocation,
    },

    #[error("Division by zero at {location}")]
    DivisionByZero { location: SourceLocation },

    /// Checked 64-bit arithmetic failed
    #[error("Integer overflow in {lhs} {operation} {rhs} at {location}")]
    IntegerOverflow {
        operation: String,
        lhs: i64,
        rhs: i64,
        location: SourceLocation,
    },

    /// Operator applied to operands of the wrong type
    #[error("Type mismatch at {location}: {operation} cannot be applied to {lhs} and {rhs}")]
    TypeMismatch {
        operation: String,
        lhs: &'static str,
        rhs: &'static str,
        location: SourceLocation,
    },

    /// `IF` or `WHILE` popped something other than a boolean
    #[error("Invalid predicate at {location}: expected a boolean, found {found}")]
    InvalidPredicate {
        found: String,
        location: SourceLocation,
    },

    #[error("Recursion limit of {limit} exceeded calling '{function}' at {location}")]
    RecursionLimitExceeded {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// A name the parser accepted is missing at run time
    #[error("Undefined name '{name}' at {location}")]
    UndefinedName {
        name: String,
        location: SourceLocation,
    },

    /// A name was bound twice in the same scope
    #[error("'{name}' is already declared at {location}")]
    DuplicateName {
        name: String,
        location: SourceLocation,
    },

    /// The output sink rejected a printed value
    #[error("Output failed at {location}: {message}")]
    OutputFailed {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::StackUnderflow { location, .. } => *location,
            RuntimeError::DivisionByZero { location } => *location,
            RuntimeError::IntegerOverflow { location, .. } => *location,
            RuntimeError::TypeMismatch { location, .. } => *location,
            RuntimeError::InvalidPredicate { location, .. } => *location,
            RuntimeError::RecursionLimitExceeded { location, .. } => *location,
            RuntimeError::UndefinedName { location, .. } => *location,
            RuntimeError::DuplicateName { location, .. } => *location,
            RuntimeError::OutputFailed { location, .. } => *location,
        }
    }

    /// Attach a location to a dictionary lookup failure
    pub(crate) fn from_dictionary(err: DictionaryError, location: SourceLocation) -> Self {
        match err {
            DictionaryError::DuplicateName { name } => RuntimeError::DuplicateName { name, location },
            DictionaryError::UndefinedName { name } => RuntimeError::UndefinedName { name, location },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = RuntimeError::StackUnderflow {
            needed: 2,
            available: 1,
            location: SourceLocation::new(3, 7),
        };
        assert_eq!(
            err.to_string(),
            "Stack underflow at line 3, column 7: needed 2 value(s), found 1"
        );
        assert_eq!(err.location(), SourceLocation::new(3, 7));
    }

    #[test]
    fn test_from_dictionary() {
        let err = RuntimeError::from_dictionary(
            DictionaryError::UndefinedName {
                name: "x".to_string(),
            },
            SourceLocation::new(1, 2),
        );
        assert_eq!(
            err,
            RuntimeError::UndefinedName {
                name: "x".to_string(),
                location: SourceLocation::new(1, 2),
            }
        );
    }
}

//! Conditional and loop execution
//!
//! Blocks run by pushing a [`Cursor`] onto the current frame. A loop
//! alternates between a `LoopCondition` cursor and a `LoopBody` cursor:
//!
//! ```text
//! BEGIN cond WHILE body REPEAT
//!
//! enter      → push LoopCondition(cond)
//! cond done  → pop predicate; True → push LoopBody(body), False → done
//! body done  → push LoopCondition(cond)
//! ```

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::stack::{Cursor, CursorKind};
use crate::output::OutputSink;
use crate::parser::ast::{AstNode, SourceLocation};

impl<'p, O: OutputSink> Interpreter<'p, O> {
    /// `IF if_body [ELSE else_body] THEN`
    pub(crate) fn enter_conditional(
        &mut self,
        if_body: &'p [AstNode],
        else_body: Option<&'p [AstNode]>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let branch = if self.pop_predicate(location)? {
            Some(if_body)
        } else {
            else_body
        };

        if let Some(nodes) = branch {
            self.push_cursor(Cursor::sequence(nodes));
        }
        Ok(())
    }

    /// `BEGIN condition WHILE body REPEAT`
    pub(crate) fn enter_loop(
        &mut self,
        condition: &'p [AstNode],
        body: &'p [AstNode],
        location: SourceLocation,
    ) {
        self.push_cursor(Cursor::new(
            condition,
            CursorKind::LoopCondition {
                condition,
                body,
                location,
            },
        ));
    }

    /// Handle a cursor that has run out of statements
    pub(crate) fn finish_cursor(&mut self, cursor: Cursor<'p>) -> Result<(), RuntimeError> {
        match cursor.kind {
            CursorKind::Sequence => Ok(()),
            CursorKind::LoopCondition {
                condition,
                body,
                location,
            } => {
                if self.pop_predicate(location)? {
                    self.push_cursor(Cursor::new(
                        body,
                        CursorKind::LoopBody {
                            condition,
                            body,
                            location,
                        },
                    ));
                }
                Ok(())
            }
            CursorKind::LoopBody {
                condition,
                body,
                location,
            } => {
                self.push_cursor(Cursor::new(
                    condition,
                    CursorKind::LoopCondition {
                        condition,
                        body,
                        location,
                    },
                ));
                Ok(())
            }
        }
    }

    /// Pop the value an `IF` or `WHILE` decides on
    fn pop_predicate(&mut self, location: SourceLocation) -> Result<bool, RuntimeError> {
        let value = self.pop_value(location)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::InvalidPredicate {
                found: format!("{} {}", value.type_name(), value),
                location,
            })
    }
}

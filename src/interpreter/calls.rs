//! Function call and return
//!
//! A call pops one argument per parameter from the caller's stack (the first
//! value popped binds to the last parameter) and pushes a fresh [`CallFrame`]
//! with an empty stack and a scope holding the parameters plus a zeroed slot
//! for every local `VARIABLE`. When the body finishes, the top `arity` values of the
//! callee's stack move onto the caller's stack in the same order and
//! the rest of the callee's stack is discarded.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::dictionary::{Binding, Scope};
use crate::memory::stack::CallFrame;
use crate::output::OutputSink;
use crate::parser::ast::SourceLocation;

impl<O: OutputSink> Interpreter<'_, O> {
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let function = self
            .call_stack
            .global_frame()
            .scope
            .function(name)
            .map_err(|err| RuntimeError::from_dictionary(err, location))?;

        let limit = self.config.max_call_depth;
        if self.call_stack.depth() >= limit {
            return Err(RuntimeError::RecursionLimitExceeded {
                function: name.to_string(),
                limit,
                location,
            });
        }

        let arguments = self.pop_values(function.parameters.len(), location)?;
        let mut scope = Scope::new();
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            scope
                .declare(parameter, Binding::Variable(value))
                .map_err(|err| RuntimeError::from_dictionary(err, location))?;
        }
        for local in &function.locals {
            scope
                .allocate(local)
                .map_err(|err| RuntimeError::from_dictionary(err, location))?;
        }

        self.call_stack
            .push_call(CallFrame::for_call(function, scope, location));
        Ok(())
    }

    /// Pop the finished frame and hand its results to the caller
    pub(crate) fn return_from_call(&mut self) -> Result<(), RuntimeError> {
        let Some(mut frame) = self.call_stack.pop_call() else {
            return Ok(());
        };
        let Some(function) = frame.function else {
            return Ok(());
        };

        let arity = function.return_arity.count();
        let available = frame.stack.len();
        let results = frame
            .stack
            .pop_n(arity)
            .ok_or_else(|| RuntimeError::StackUnderflow {
                needed: arity,
                available,
                location: frame.call_site.unwrap_or(function.location),
            })?;

        self.call_stack.current_frame_mut().stack.extend(results);
        Ok(())
    }
}

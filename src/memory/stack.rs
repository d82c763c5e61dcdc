//! Value stacks and the call stack
//!
//! This module provides the runtime storage the interpreter walks over:
//! - [`ValueStack`]: LIFO operand stack of [`Value`]s
//! - [`Cursor`]: Position inside a statement list, tagged with what to do when it runs out
//! - [`CallFrame`]: One activation (value stack, scope, and pending cursors)
//! - [`CallStack`]: The global frame plus the stack of active calls
//!
//! # Execution Without Host Recursion
//!
//! Nested blocks and function calls never recurse on the Rust stack. Entering
//! a block pushes a [`Cursor`] onto the current frame; calling a function
//! pushes a [`CallFrame`]. Call depth is therefore limited only by
//! configuration, never by the host thread's stack size.

use super::dictionary::Scope;
use super::value::Value;
use crate::parser::ast::{AstNode, FunctionDef, SourceLocation};

/// LIFO operand stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueStack {
    values: Vec<Value>,
}

impl ValueStack {
    pub fn new() -> Self {
        ValueStack { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Remove the top `n` values, returned bottom-to-top.
    ///
    /// Leaves the stack untouched and returns `None` if fewer than `n` are
    /// available.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Value>> {
        let split = self.values.len().checked_sub(n)?;
        Some(self.values.split_off(split))
    }

    pub fn peek(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        self.values.extend(values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom-to-top view
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl FromIterator<Value> for ValueStack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        ValueStack {
            values: iter.into_iter().collect(),
        }
    }
}

/// What a cursor represents, and so what happens once it is exhausted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorKind<'p> {
    /// Top-level program, function body, or `IF` branch; finishing does nothing
    Sequence,
    /// Loop condition; finishing pops the predicate
    LoopCondition {
        condition: &'p [AstNode],
        body: &'p [AstNode],
        location: SourceLocation,
    },
    /// Loop body; finishing re-enters the condition
    LoopBody {
        condition: &'p [AstNode],
        body: &'p [AstNode],
        location: SourceLocation,
    },
}

/// Position within a statement list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor<'p> {
    nodes: &'p [AstNode],
    position: usize,
    pub kind: CursorKind<'p>,
}

impl<'p> Cursor<'p> {
    pub fn new(nodes: &'p [AstNode], kind: CursorKind<'p>) -> Self {
        Cursor {
            nodes,
            position: 0,
            kind,
        }
    }

    pub fn sequence(nodes: &'p [AstNode]) -> Self {
        Cursor::new(nodes, CursorKind::Sequence)
    }

    /// Advance past the next statement and return it
    pub fn next_node(&mut self) -> Option<&'p AstNode> {
        let nodes: &'p [AstNode] = self.nodes;
        let node = nodes.get(self.position)?;
        self.position += 1;
        Some(node)
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.nodes.len()
    }
}

/// One activation record
#[derive(Debug, Clone)]
pub struct CallFrame<'p> {
    /// `None` for the top-level frame
    pub function: Option<&'p FunctionDef>,
    pub stack: ValueStack,
    pub scope: Scope<'p>,
    pub cursors: Vec<Cursor<'p>>,
    pub call_site: Option<SourceLocation>, // Where the call was made
}

impl<'p> CallFrame<'p> {
    /// The top-level frame: global stack and global scope
    pub fn top_level(scope: Scope<'p>, stack: ValueStack, nodes: &'p [AstNode]) -> Self {
        CallFrame {
            function: None,
            stack,
            scope,
            cursors: vec![Cursor::sequence(nodes)],
            call_site: None,
        }
    }

    /// A fresh frame for a call: empty local stack, scope holding the arguments
    pub fn for_call(function: &'p FunctionDef, scope: Scope<'p>, call_site: SourceLocation) -> Self {
        CallFrame {
            function: Some(function),
            stack: ValueStack::new(),
            scope,
            cursors: vec![Cursor::sequence(&function.body)],
            call_site: Some(call_site),
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.map(|f| f.name.as_str())
    }
}

/// The global frame plus every active call, innermost last
#[derive(Debug, Clone)]
pub struct CallStack<'p> {
    global: CallFrame<'p>,
    calls: Vec<CallFrame<'p>>,
}

impl<'p> CallStack<'p> {
    pub fn new(global: CallFrame<'p>) -> Self {
        CallStack {
            global,
            calls: Vec::new(),
        }
    }

    pub fn push_call(&mut self, frame: CallFrame<'p>) {
        self.calls.push(frame);
    }

    pub fn pop_call(&mut self) -> Option<CallFrame<'p>> {
        self.calls.pop()
    }

    /// Number of active function calls (0 at top level)
    pub fn depth(&self) -> usize {
        self.calls.len()
    }

    pub fn current_frame(&self) -> &CallFrame<'p> {
        self.calls.last().unwrap_or(&self.global)
    }

    pub fn current_frame_mut(&mut self) -> &mut CallFrame<'p> {
        match self.calls.last_mut() {
            Some(frame) => frame,
            None => &mut self.global,
        }
    }

    pub fn global_frame(&self) -> &CallFrame<'p> {
        &self.global
    }
}

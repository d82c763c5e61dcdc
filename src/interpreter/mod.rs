//! Words interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter loop and per-statement execution
//! - [`errors`]: Runtime error types
//! - [`config`]: Execution limits
//! - `ops`, `control`, `calls`: Operators, `IF`/`BEGIN` blocks, function calls
//!
//! # Execution Model
//!
//! The interpreter walks the AST without recursing on the host stack. Each
//! active function call is a heap-allocated frame holding its own value stack,
//! local scope, and a stack of block cursors. The top-level program runs in
//! the global frame.
//!
//! # Output
//!
//! `__PRINT__` hands values to an [`OutputSink`](crate::output::OutputSink)
//! rather than writing to stdout.

mod calls;
pub mod config;
mod control;
pub mod engine;
pub mod errors;
pub mod ops;

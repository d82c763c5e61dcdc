//! Memory model for the Words interpreter
//!
//! This module provides the core runtime storage:
//! - [`value`]: Runtime value representation (Int, Bool)
//! - [`stack`]: Value stacks, block cursors, and the call stack
//! - [`dictionary`]: Name scopes binding variables and functions
//!
//! # Scopes
//!
//! There are exactly two kinds of scope. The global scope holds top-level
//! variables and every function; each call gets a fresh local scope holding
//! its parameters and local variables. A function body never sees globals
//! other than function names, and top-level code never sees locals.

pub mod dictionary;
pub mod stack;
pub mod value;

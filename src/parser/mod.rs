//! Words source code parser
//!
//! This module transforms Words source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST) and static scope checks
//! - [`ast`]: AST node definitions
//! - [`trace`]: Optional instrumentation hook for the parser
//!
//! # Language Summary
//!
//! - Values: integers and the booleans `True` / `False`
//! - Operators: `+ - * / == > < >= <=`, all binary and postfix
//! - Variables: `VARIABLE name`, `ASSIGN name`
//! - Control flow: `IF ... ELSE ... THEN`, `BEGIN ... WHILE ... REPEAT`
//! - Functions: `| NAME ( VALUE a VALUE b ) ... RETURN n |`
//! - Output: `__PRINT__`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser. No external parser generator
//! dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
mod statements;
pub mod trace;

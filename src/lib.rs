//! # Introduction
//!
//! Words is a small stack-based, Forth-inspired language. Source text is
//! tokenised, parsed into an AST with static scope checks, and executed by a
//! tree-walking interpreter that threads values through an explicit stack.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → final stack + printed values
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST, rejecting undeclared,
//!    duplicate, and out-of-scope names before anything runs.
//! 2. [`interpreter`]: walks the AST with an explicit call-frame stack, so the
//!    recursion limit is a configuration value rather than a host stack size.
//! 3. [`memory`]: tagged [`memory::value::Value`]s, value stacks, and the name
//!    scopes in [`memory::dictionary`].
//! 4. [`output`]: sinks for `__PRINT__`; [`output::CapturedOutput`] records
//!    every printed value with its source location.
//!
//! ## The language
//!
//! ```text
//! | FIB ( VALUE N )
//!     N 2 < IF N ELSE N 1 - FIB N 2 - FIB + THEN
//! RETURN 1 |
//! 10 FIB __PRINT__      # prints 55
//! ```
//!
//! Values: 64-bit integers and `True` / `False`.
//! Operators: `+ - * / == > < >= <=`, each computing `lhs OP rhs`.
//! Statements: `VARIABLE x`, `ASSIGN x`, `IF … ELSE … THEN`,
//! `BEGIN … WHILE … REPEAT`, `| NAME ( VALUE a … ) … RETURN n |`, `__PRINT__`.
//!
//! ## Embedding
//!
//! ```
//! let outcome = words::run_source("1 2 + DUP", &[]);
//! assert!(outcome.is_err()); // DUP is not defined
//!
//! let outcome = words::run_source("3 4 * __PRINT__ True", &[]).unwrap();
//! assert_eq!(outcome.printed, vec![words::Value::Int(12)]);
//! assert_eq!(outcome.stack, vec![words::Value::Bool(true)]);
//! ```

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod output;
pub mod parser;

pub use error::WordsError;
pub use interpreter::config::InterpreterConfig;
pub use interpreter::engine::Interpreter;
pub use interpreter::errors::RuntimeError;
pub use memory::value::Value;
pub use parser::ast::Program;

/// Result of running a program to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Final global stack, bottom to top
    pub stack: Vec<Value>,
    /// Every value passed to `__PRINT__`, in order
    pub printed: Vec<Value>,
}

/// Lex and parse `source` into a runnable [`Program`].
pub fn compile(source: &str) -> Result<Program, WordsError> {
    parser::parse::parse_source(source)
}

/// Compile and run `source` with the default configuration.
///
/// `initial_stack` seeds the global stack, bottom to top.
pub fn run_source(source: &str, initial_stack: &[i64]) -> Result<RunOutcome, WordsError> {
    let program = compile(source)?;
    let mut interpreter = Interpreter::new(&program);
    let stack = interpreter.run(initial_stack)?;

    Ok(RunOutcome {
        stack,
        printed: interpreter.output().values(),
    })
}

//! Optional parser instrumentation
//!
//! A tracer is a callback installed with [`Parser::with_tracer`] that observes
//! every statement dispatch. It has no influence on the parse itself.
//!
//! [`Parser::with_tracer`]: crate::parser::parse::Parser::with_tracer

use super::lexer::Token;

/// Events reported to a parser tracer
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent<'a> {
    /// A grammar rule is about to consume input starting at `token`
    Enter { rule: &'static str, token: &'a Token },
    /// The rule finished; `ok` is false if it produced an error
    Exit { rule: &'static str, ok: bool },
}

pub type Tracer<'t> = Box<dyn FnMut(&ParseEvent<'_>) + 't>;

/// Tracer that prints an indented call trace to stderr.
pub fn stderr_tracer<'t>() -> Tracer<'t> {
    let mut depth = 0usize;
    Box::new(move |event| match event {
        ParseEvent::Enter { rule, token } => {
            eprintln!(
                "{:indent$}{}({}) at line {}",
                "",
                rule,
                token,
                token.location.line,
                indent = depth * 2
            );
            depth += 1;
        }
        ParseEvent::Exit { rule, ok } => {
            depth = depth.saturating_sub(1);
            if !ok {
                eprintln!("{:indent$}{} failed", "", rule, indent = depth * 2);
            }
        }
    })
}

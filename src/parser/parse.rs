//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, the static symbol tables, helper methods, and the
//! main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser over the token stream with one
//! token of lookahead (two to tell a nested function header from a stray `|`):
//! - This module: Parser struct, symbol tables, helper methods, and coordination
//! - `statements`: Parsing individual statements and the block constructs
//!   (`IF`/`ELSE`/`THEN`, `BEGIN`/`WHILE`/`REPEAT`, `| ... |` functions)
//!
//! # Static Scoping
//!
//! Name resolution happens during the single parse pass. The parser tracks
//! whether it is at top level or inside a function body. Inside a body only
//! that function's parameters and local `VARIABLE`s are visible; function
//! names are visible everywhere. Redeclaring a visible name is an error, so
//! no binding ever shadows another.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::trace::{ParseEvent, Tracer};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// What went wrong while parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    #[error("'{name}' is already declared")]
    DuplicateName { name: String },

    #[error("'{name}' is not a parameter or local variable of function '{function}'")]
    ScopeViolation { name: String, function: String },

    #[error("undefined name '{name}'")]
    UndefinedName { name: String },

    #[error("return arity must be 1, 2 or 3, found {found}")]
    BadReturnArity { found: String },
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {location}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The offending token
    pub token: Token,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, token: &Token) -> Self {
        ParseError {
            kind,
            token: token.clone(),
            location: token.location,
        }
    }
}

/// Kinds of global bindings known to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalName {
    Variable,
    Function,
}

/// The function whose body is currently being parsed
#[derive(Debug, Clone)]
pub(crate) struct FunctionScope {
    pub name: String,
    /// Parameters and local `VARIABLE`s
    pub locals: FxHashSet<String>,
    /// Local `VARIABLE`s only, in declaration order
    pub variables: Vec<String>,
}

/// Recursive descent parser for Words
pub struct Parser<'t> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Global variables and functions declared so far
    pub(crate) globals: FxHashMap<String, GlobalName>,
    /// Every function name declared anywhere in the source
    pub(crate) known_functions: FxHashSet<String>,
    /// Top-level `VARIABLE`s in declaration order
    pub(crate) global_variables: Vec<String>,
    pub(crate) function_scope: Option<FunctionScope>,
    tracer: Option<Tracer<'t>>,
}

impl<'t> Parser<'t> {
    pub fn new(source: &str) -> Result<Self, LexError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an already-lexed token sequence.
    ///
    /// An end-of-input token is appended if the sequence does not end in one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }

        Self {
            tokens,
            position: 0,
            globals: FxHashMap::default(),
            known_functions: FxHashSet::default(),
            global_variables: Vec::new(),
            function_scope: None,
            tracer: None,
        }
    }

    /// Install a callback that observes every statement dispatch.
    pub fn with_tracer(mut self, tracer: impl FnMut(&ParseEvent<'_>) + 't) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Parse the entire program (top-level statements)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.collect_function_names();

        let mut program = Program::new();
        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.nodes.push(stmt);
        }

        program.globals = std::mem::take(&mut self.global_variables);
        Ok(program)
    }

    /// Record every `| NAME (` header up front so bodies can call functions
    /// declared further down the file.
    fn collect_function_names(&mut self) {
        for window in self.tokens.windows(3) {
            if window[0].kind == TokenKind::FunctionDelim
                && window[1].kind == TokenKind::Identifier
                && window[2].kind == TokenKind::ParenOpen
            {
                self.known_functions.insert(window[1].text.clone());
            }
        }
    }

    /// Parse one statement, reporting to the tracer if one is installed.
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        if self.tracer.is_none() {
            return self.dispatch_statement();
        }

        let rule = Self::rule_name(self.peek().kind);
        if let Some(tracer) = self.tracer.as_mut() {
            tracer(&ParseEvent::Enter {
                rule,
                token: &self.tokens[self.position],
            });
        }

        let result = self.dispatch_statement();

        if let Some(tracer) = self.tracer.as_mut() {
            tracer(&ParseEvent::Exit {
                rule,
                ok: result.is_ok(),
            });
        }
        result
    }

    fn rule_name(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Integer(_) | TokenKind::Boolean(_) => "literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Variable => "variable_declaration",
            TokenKind::Assign => "assignment",
            TokenKind::If => "conditional",
            TokenKind::Begin => "loop",
            TokenKind::FunctionDelim => "function_declaration",
            TokenKind::Operator(_) => "operator",
            TokenKind::Macro(_) => "macro_call",
            _ => "statement",
        }
    }

    // ===== Symbol tables =====

    /// Whether `name` is a variable (or parameter) visible in the current scope
    pub(crate) fn is_variable_in_scope(&self, name: &str) -> bool {
        match &self.function_scope {
            Some(scope) => scope.locals.contains(name),
            None => self.globals.get(name) == Some(&GlobalName::Variable),
        }
    }

    pub(crate) fn is_function(&self, name: &str) -> bool {
        self.known_functions.contains(name)
            || self.globals.get(name) == Some(&GlobalName::Function)
    }

    /// Register a `VARIABLE` in the currently open scope.
    pub(crate) fn declare_variable(&mut self, name_token: &Token) -> Result<(), ParseError> {
        let name = &name_token.text;
        if let Some(scope) = &self.function_scope {
            self.ensure_local_name_free(name_token, &scope.locals)?;
        } else if self.globals.contains_key(name) {
            return Err(self.duplicate(name_token));
        }

        match self.function_scope.as_mut() {
            Some(scope) => {
                scope.locals.insert(name.clone());
                scope.variables.push(name.clone());
            }
            None => {
                self.globals.insert(name.clone(), GlobalName::Variable);
                self.global_variables.push(name.clone());
            }
        }
        Ok(())
    }

    /// A local name may not repeat another local, a global, or any function.
    pub(crate) fn ensure_local_name_free(
        &self,
        name_token: &Token,
        locals: &FxHashSet<String>,
    ) -> Result<(), ParseError> {
        let name = &name_token.text;
        if locals.contains(name) || self.globals.contains_key(name) || self.is_function(name) {
            return Err(self.duplicate(name_token));
        }
        Ok(())
    }

    // ===== Error helpers =====

    pub(crate) fn unexpected(&self, token: &Token, expected: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: token.to_string(),
                expected: expected.to_string(),
            },
            token,
        )
    }

    pub(crate) fn duplicate(&self, token: &Token) -> ParseError {
        ParseError::new(
            ParseErrorKind::DuplicateName {
                name: token.text.clone(),
            },
            token,
        )
    }

    /// Error for an identifier that resolves to nothing visible here
    pub(crate) fn unresolved(&self, token: &Token) -> ParseError {
        let kind = match &self.function_scope {
            Some(scope) => ParseErrorKind::ScopeViolation {
                name: token.text.clone(),
                function: scope.name.clone(),
            },
            None => ParseErrorKind::UndefinedName {
                name: token.text.clone(),
            },
        };
        ParseError::new(kind, token)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume and return the current token. End of input is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(self.peek(), expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, expected: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::Identifier, expected)
    }
}

/// Lex and parse `source` in one call.
pub fn parse_source(source: &str) -> Result<Program, crate::WordsError> {
    let mut parser = Parser::new(source)?;
    Ok(parser.parse_program()?)
}

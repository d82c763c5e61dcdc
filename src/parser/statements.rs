//! Statement parsing implementation
//!
//! This module handles parsing of every Words statement:
//!
//! - Leaf statements: literals, operators, `__PRINT__`, identifiers
//! - Declarations: `VARIABLE name`, `| NAME ( VALUE a ... ) body RETURN n |`
//! - Assignment: `ASSIGN name` and the postfix `name ASSIGN`
//! - Control flow: `IF ... [ELSE ...] THEN`, `BEGIN ... WHILE ... REPEAT`
//!
//! # Grammar
//!
//! ```text
//! statement   ::= literal | operator | macro | identifier
//!               | "VARIABLE" name | "ASSIGN" name | name "ASSIGN"
//!               | conditional | loop | function
//! conditional ::= "IF" statement* ["ELSE" statement*] "THEN"
//! loop        ::= "BEGIN" statement* "WHILE" statement* "REPEAT"
//! function    ::= "|" name "(" ("VALUE" name)* ")" statement* "RETURN" arity "|"
//! ```
//!
//! Block constructs have no braces. Each opener parses statements until it
//! meets one of the closers it permits; any other closer is a stray token.

use crate::memory::value::Value;
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{FunctionScope, GlobalName, ParseError, ParseErrorKind, Parser};
use rustc_hash::FxHashSet;

impl Parser<'_> {
    pub(crate) fn dispatch_statement(&mut self) -> Result<AstNode, ParseError> {
        let token = self.peek().clone();
        let location = token.location;

        match token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(AstNode::Literal {
                    value: Value::Int(n),
                    location,
                })
            }
            TokenKind::Boolean(b) => {
                self.advance();
                Ok(AstNode::Literal {
                    value: Value::Bool(b),
                    location,
                })
            }
            TokenKind::Operator(op) => {
                self.advance();
                Ok(AstNode::Operator { op, location })
            }
            TokenKind::Macro(kind) => {
                self.advance();
                Ok(AstNode::MacroCall { kind, location })
            }
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::Variable => self.parse_variable_declaration(),
            TokenKind::Assign => self.parse_assignment(),
            TokenKind::If => self.parse_conditional(),
            TokenKind::Begin => self.parse_loop(),
            TokenKind::FunctionDelim => self.parse_function_declaration(),
            TokenKind::Else
            | TokenKind::Then
            | TokenKind::While
            | TokenKind::Repeat
            | TokenKind::Value
            | TokenKind::Return
            | TokenKind::ParenOpen
            | TokenKind::ParenClose
            | TokenKind::Eof => Err(self.unexpected(&token, "statement")),
        }
    }

    /// Parse statements until one of `closers`, which is consumed and returned.
    pub(crate) fn parse_block(
        &mut self,
        closers: &[TokenKind],
        expected: &str,
    ) -> Result<(Vec<AstNode>, Token), ParseError> {
        let mut statements = Vec::new();

        loop {
            let kind = self.peek().kind;
            if closers.contains(&kind) {
                return Ok((statements, self.advance()));
            }
            if kind == TokenKind::Eof {
                return Err(self.unexpected(self.peek(), expected));
            }
            statements.push(self.parse_statement()?);
        }
    }

    /// A bare identifier: variable read, postfix assignment, or function call
    ///
    /// A variable directly followed by `ASSIGN` is always the postfix form,
    /// so `5 x ASSIGN x` stores 5 and then reads it back.
    fn parse_identifier(&mut self) -> Result<AstNode, ParseError> {
        let token = self.advance();
        let location = token.location;

        if self.is_variable_in_scope(&token.text) {
            if self.check(TokenKind::Assign) {
                self.advance();
                return Ok(AstNode::Assignment {
                    name: token.text,
                    location,
                });
            }
            return Ok(AstNode::VariableRead {
                name: token.text,
                location,
            });
        }

        if self.is_function(&token.text) {
            return Ok(AstNode::FunctionCall {
                name: token.text,
                location,
            });
        }

        Err(self.unresolved(&token))
    }

    /// `VARIABLE name`
    fn parse_variable_declaration(&mut self) -> Result<AstNode, ParseError> {
        let keyword = self.advance();
        let name = self.expect_identifier("variable name after 'VARIABLE'")?;
        self.declare_variable(&name)?;

        Ok(AstNode::VariableDeclaration {
            name: name.text,
            location: keyword.location,
        })
    }

    /// `ASSIGN name`, when `ASSIGN` does not directly follow a variable
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let keyword = self.advance();
        let target = self.expect_identifier("variable name after 'ASSIGN'")?;

        if self.is_variable_in_scope(&target.text) {
            return Ok(AstNode::Assignment {
                name: target.text,
                location: keyword.location,
            });
        }

        if self.is_function(&target.text) {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    found: format!("function '{}'", target.text),
                    expected: "variable name after 'ASSIGN'".to_string(),
                },
                &target,
            ));
        }

        Err(self.unresolved(&target))
    }

    /// `IF if_body [ELSE else_body] THEN`
    fn parse_conditional(&mut self) -> Result<AstNode, ParseError> {
        let keyword = self.advance();

        let (if_body, closer) =
            self.parse_block(&[TokenKind::Else, TokenKind::Then], "'ELSE' or 'THEN'")?;

        let else_body = if closer.kind == TokenKind::Else {
            let (body, _) = self.parse_block(&[TokenKind::Then], "'THEN'")?;
            Some(body)
        } else {
            None
        };

        Ok(AstNode::Conditional {
            if_body,
            else_body,
            location: keyword.location,
        })
    }

    /// `BEGIN condition WHILE body REPEAT`
    fn parse_loop(&mut self) -> Result<AstNode, ParseError> {
        let keyword = self.advance();

        let (condition, _) = self.parse_block(&[TokenKind::While], "'WHILE'")?;
        let (body, _) = self.parse_block(&[TokenKind::Repeat], "'REPEAT'")?;

        Ok(AstNode::Loop {
            condition,
            body,
            location: keyword.location,
        })
    }

    /// `| NAME ( VALUE a VALUE b ) body RETURN arity |`
    fn parse_function_declaration(&mut self) -> Result<AstNode, ParseError> {
        let opener = self.advance();

        if self.function_scope.is_some() {
            let nested_header = self.check(TokenKind::Identifier)
                && self
                    .peek_ahead(1)
                    .is_some_and(|t| t.kind == TokenKind::ParenOpen);
            let expected = if nested_header {
                "statement (functions can only be declared at top level)"
            } else {
                "'RETURN' before the closing '|'"
            };
            return Err(self.unexpected(&opener, expected));
        }

        let name = self.expect_identifier("function name after '|'")?;
        if self.globals.contains_key(&name.text) {
            return Err(self.duplicate(&name));
        }
        self.globals.insert(name.text.clone(), GlobalName::Function);

        self.expect_token(TokenKind::ParenOpen, "'(' after function name")?;
        let (parameters, locals) = self.parse_parameters()?;

        self.function_scope = Some(FunctionScope {
            name: name.text.clone(),
            locals,
            variables: Vec::new(),
        });
        let (body, _) = self.parse_block(&[TokenKind::Return], "'RETURN'")?;
        let local_variables = self
            .function_scope
            .take()
            .map(|scope| scope.variables)
            .unwrap_or_default();

        let arity_token = self.advance();
        let return_arity = match arity_token.kind {
            TokenKind::Integer(n) => ReturnArity::from_count(n),
            _ => None,
        }
        .ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::BadReturnArity {
                    found: arity_token.to_string(),
                },
                &arity_token,
            )
        })?;

        self.expect_token(TokenKind::FunctionDelim, "'|' after return arity")?;

        Ok(AstNode::FunctionDeclaration(FunctionDef {
            name: name.text,
            parameters,
            locals: local_variables,
            body,
            return_arity,
            location: opener.location,
        }))
    }

    /// `VALUE a VALUE b ... )`, the opening parenthesis already consumed
    fn parse_parameters(&mut self) -> Result<(Vec<String>, FxHashSet<String>), ParseError> {
        let mut parameters = Vec::new();
        let mut locals = FxHashSet::default();

        loop {
            match self.peek().kind {
                TokenKind::ParenClose => {
                    self.advance();
                    return Ok((parameters, locals));
                }
                TokenKind::Value => {
                    self.advance();
                    let param = self.expect_identifier("parameter name after 'VALUE'")?;
                    self.ensure_local_name_free(&param, &locals)?;
                    locals.insert(param.text.clone());
                    parameters.push(param.text);
                }
                _ => return Err(self.unexpected(self.peek(), "'VALUE' or ')'")),
            }
        }
    }
}

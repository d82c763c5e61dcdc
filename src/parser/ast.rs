// AST (Abstract Syntax Tree) definitions for the Words interpreter

use crate::memory::value::Value;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl BinOp {
    /// The source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.symbol())
    }
}

/// Built-in macros. These are not user-definable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Print,
}

impl Macro {
    pub fn name(self) -> &'static str {
        match self {
            Macro::Print => "__PRINT__",
        }
    }
}

/// Number of values a function leaves on its caller's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnArity {
    One,
    Two,
    Three,
}

impl ReturnArity {
    /// Converts a literal `RETURN` count, rejecting anything outside 1..=3.
    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            1 => Some(ReturnArity::One),
            2 => Some(ReturnArity::Two),
            3 => Some(ReturnArity::Three),
            _ => None,
        }
    }

    pub fn count(self) -> usize {
        match self {
            ReturnArity::One => 1,
            ReturnArity::Two => 2,
            ReturnArity::Three => 3,
        }
    }
}

/// A user function: `| NAME ( VALUE a VALUE b ) body RETURN n |`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    /// Every `VARIABLE` declared in the body, in source order
    pub locals: Vec<String>,
    pub body: Vec<AstNode>,
    pub return_arity: ReturnArity,
    pub location: SourceLocation,
}

/// AST node types
///
/// Block constructs own their bodies directly; there are no labels and no
/// forward references anywhere in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Pushes a constant
    Literal {
        value: Value,
        location: SourceLocation,
    },

    /// Pops two operands, pushes the result
    Operator {
        op: BinOp,
        location: SourceLocation,
    },

    /// `VARIABLE name`
    VariableDeclaration {
        name: String,
        location: SourceLocation,
    },

    /// A bare identifier naming a variable or parameter in scope
    VariableRead {
        name: String,
        location: SourceLocation,
    },

    /// `ASSIGN name`
    Assignment {
        name: String,
        location: SourceLocation,
    },

    /// `IF ... [ELSE ...] THEN`
    Conditional {
        if_body: Vec<AstNode>,
        else_body: Option<Vec<AstNode>>,
        location: SourceLocation,
    },

    /// `BEGIN condition WHILE body REPEAT`
    Loop {
        condition: Vec<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },

    FunctionDeclaration(FunctionDef),

    FunctionCall {
        name: String,
        location: SourceLocation,
    },

    MacroCall {
        kind: Macro,
        location: SourceLocation,
    },
}

impl AstNode {
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::Literal { location, .. }
            | AstNode::Operator { location, .. }
            | AstNode::VariableDeclaration { location, .. }
            | AstNode::VariableRead { location, .. }
            | AstNode::Assignment { location, .. }
            | AstNode::Conditional { location, .. }
            | AstNode::Loop { location, .. }
            | AstNode::FunctionCall { location, .. }
            | AstNode::MacroCall { location, .. } => *location,
            AstNode::FunctionDeclaration(def) => def.location,
        }
    }
}

/// Complete program (top-level statements)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub nodes: Vec<AstNode>,
    /// Every top-level `VARIABLE`, in source order, including those nested
    /// in blocks that may never run
    pub globals: Vec<String>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            nodes: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// All top-level function declarations, in source order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.nodes.iter().filter_map(|node| match node {
            AstNode::FunctionDeclaration(def) => Some(def),
            _ => None,
        })
    }
}

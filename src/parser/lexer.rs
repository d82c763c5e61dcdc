//! Lexer (tokenizer) for Words source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Every token is a whitespace-separated word; `#` starts a comment that runs to
//! the end of the line. The lexer only checks that each word is a recognizable
//! token. Block structure and scoping are left to the parser.

use super::ast::{BinOp, Macro, SourceLocation};
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer(i64),
    Boolean(bool),

    // Identifiers
    Identifier,

    // Keywords
    Variable,
    Assign,
    If,
    Else,
    Then,
    Begin,
    While,
    Repeat,
    Value,
    Return,

    // Delimiters
    FunctionDelim, // |
    ParenOpen,     // (
    ParenClose,    // )

    Operator(BinOp),
    Macro(Macro),

    // End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(_) => write!(f, "integer literal"),
            TokenKind::Boolean(_) => write!(f, "boolean literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Variable => write!(f, "'VARIABLE'"),
            TokenKind::Assign => write!(f, "'ASSIGN'"),
            TokenKind::If => write!(f, "'IF'"),
            TokenKind::Else => write!(f, "'ELSE'"),
            TokenKind::Then => write!(f, "'THEN'"),
            TokenKind::Begin => write!(f, "'BEGIN'"),
            TokenKind::While => write!(f, "'WHILE'"),
            TokenKind::Repeat => write!(f, "'REPEAT'"),
            TokenKind::Value => write!(f, "'VALUE'"),
            TokenKind::Return => write!(f, "'RETURN'"),
            TokenKind::FunctionDelim => write!(f, "'|'"),
            TokenKind::ParenOpen => write!(f, "'('"),
            TokenKind::ParenClose => write!(f, "')'"),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Macro(m) => write!(f, "macro '{}'", m.name()),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A lexical unit with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer(_) | TokenKind::Boolean(_) => {
                write!(f, "{} {}", self.kind, self.text)
            }
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Lexer error at {location}: invalid character '{character}'")]
    InvalidCharacter {
        character: char,
        location: SourceLocation,
    },
    #[error("Lexer error at {location}: integer literal '{literal}' is out of range")]
    IntegerOutOfRange {
        literal: String,
        location: SourceLocation,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::InvalidCharacter { location, .. }
            | LexError::IntegerOutOfRange { location, .. } => *location,
        }
    }
}

/// Fixed spellings of keywords, operators, delimiters and macros.
fn fixed_token(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "VARIABLE" => TokenKind::Variable,
        "ASSIGN" => TokenKind::Assign,
        "IF" => TokenKind::If,
        "ELSE" => TokenKind::Else,
        "THEN" => TokenKind::Then,
        "BEGIN" => TokenKind::Begin,
        "WHILE" => TokenKind::While,
        "REPEAT" => TokenKind::Repeat,
        "VALUE" => TokenKind::Value,
        "RETURN" => TokenKind::Return,
        "True" => TokenKind::Boolean(true),
        "False" => TokenKind::Boolean(false),
        "|" => TokenKind::FunctionDelim,
        "(" => TokenKind::ParenOpen,
        ")" => TokenKind::ParenClose,
        "+" => TokenKind::Operator(BinOp::Add),
        "-" => TokenKind::Operator(BinOp::Sub),
        "*" => TokenKind::Operator(BinOp::Mul),
        "/" => TokenKind::Operator(BinOp::Div),
        "==" => TokenKind::Operator(BinOp::Eq),
        ">" => TokenKind::Operator(BinOp::Gt),
        "<" => TokenKind::Operator(BinOp::Lt),
        ">=" => TokenKind::Operator(BinOp::Ge),
        "<=" => TokenKind::Operator(BinOp::Le),
        "__PRINT__" => TokenKind::Macro(Macro::Print),
        _ => return None,
    };
    Some(kind)
}

/// Digits with an optional leading `-`. A `-` glued to digits always makes a
/// negative literal such as `-5`, never an identifier or a subtraction.
fn is_integer_word(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_identifier_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Whether `word` is, by shape alone, a complete token.
fn is_recognizable(word: &str) -> bool {
    fixed_token(word).is_some() || is_integer_word(word) || is_identifier_word(word)
}

/// Lexer for Words source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Read one word and classify it
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let mut word = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '#' {
                break;
            }
            word.push(ch);
            self.advance();
        }

        if let Some(kind) = fixed_token(&word) {
            return Ok(Token::new(kind, word, loc));
        }

        if is_integer_word(&word) {
            let value = word
                .parse::<i64>()
                .map_err(|_| LexError::IntegerOutOfRange {
                    literal: word.clone(),
                    location: loc,
                })?;
            return Ok(Token::new(TokenKind::Integer(value), word, loc));
        }

        if is_identifier_word(&word) {
            return Ok(Token::new(TokenKind::Identifier, word, loc));
        }

        Err(Self::invalid_character(&word, loc))
    }

    /// Blame the first character that cannot extend the longest recognizable
    /// prefix of `word`.
    fn invalid_character(word: &str, loc: SourceLocation) -> LexError {
        let chars: Vec<char> = word.chars().collect();
        let valid_prefix = (1..chars.len())
            .rev()
            .find(|&len| is_recognizable(&chars[..len].iter().collect::<String>()))
            .unwrap_or(0);

        LexError::InvalidCharacter {
            character: chars[valid_prefix],
            location: SourceLocation::new(loc.line, loc.column + valid_prefix),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(
            kinds("VARIABLE x 5 ASSIGN x x 1 + __PRINT__"),
            vec![
                TokenKind::Variable,
                TokenKind::Identifier,
                TokenKind::Integer(5),
                TokenKind::Assign,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Integer(1),
                TokenKind::Operator(BinOp::Add),
                TokenKind::Macro(Macro::Print),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_function_delimiters() {
        assert_eq!(
            kinds("| F ( VALUE X ) X RETURN 1 |"),
            vec![
                TokenKind::FunctionDelim,
                TokenKind::Identifier,
                TokenKind::ParenOpen,
                TokenKind::Value,
                TokenKind::Identifier,
                TokenKind::ParenClose,
                TokenKind::Identifier,
                TokenKind::Return,
                TokenKind::Integer(1),
                TokenKind::FunctionDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_negative_literal_vs_subtraction() {
        assert_eq!(
            kinds("3 -5 -"),
            vec![
                TokenKind::Integer(3),
                TokenKind::Integer(-5),
                TokenKind::Operator(BinOp::Sub),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_discarded() {
        let tokens = tokenize("1 # ignored IF ELSE\n2#also ignored\n3").unwrap();
        let values: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            values,
            vec![
                TokenKind::Integer(1),
                TokenKind::Integer(2),
                TokenKind::Integer(3),
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].location, SourceLocation::new(2, 1));
        assert_eq!(tokens[2].location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let tokens = tokenize("if If IF").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::If);
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("1 2\n  ab$c").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidCharacter {
                character: '$',
                location: SourceLocation::new(2, 5),
            }
        );
    }

    #[test]
    fn test_invalid_operator_spelling() {
        let err = tokenize("1 2 =>").unwrap_err();
        assert!(matches!(
            err,
            LexError::InvalidCharacter { character: '=', .. }
        ));
    }

    #[test]
    fn test_digits_followed_by_letters() {
        let err = tokenize("12abc").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidCharacter {
                character: 'a',
                location: SourceLocation::new(1, 3),
            }
        );
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(matches!(err, LexError::IntegerOutOfRange { .. }));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds("  \n # only a comment\n"), vec![TokenKind::Eof]);
    }
}

//! Error kinds for the lexer, parser and evaluator contract (spec ch. 7).
//!
//! All failures are values carrying a kind tag, a message, and the
//! 1-based source position at which they were raised. Nothing in this
//! crate recovers from an error; the first one aborts the call chain.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LangError {
    /// Illegal character sequence, missing nud/led, unterminated
    /// statement or block, unexpected EOF.
    Syntax { message: String, line: usize, col: usize },
    /// Undefined identifier or unknown function.
    Value { message: String, line: usize, col: usize },
    /// Operands of incompatible types.
    Type { message: String, line: usize, col: usize },
    /// Integer or float division or modulo by zero.
    DivideByZero { message: String, line: usize, col: usize },
}

impl LangError {
    pub fn syntax(message: impl Into<String>, line: usize, col: usize) -> Self {
        LangError::Syntax { message: message.into(), line, col }
    }

    pub fn value(message: impl Into<String>, line: usize, col: usize) -> Self {
        LangError::Value { message: message.into(), line, col }
    }

    pub fn type_error(message: impl Into<String>, line: usize, col: usize) -> Self {
        LangError::Type { message: message.into(), line, col }
    }

    pub fn divide_by_zero(message: impl Into<String>, line: usize, col: usize) -> Self {
        LangError::DivideByZero { message: message.into(), line, col }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LangError::Syntax { .. } => "SyntaxError",
            LangError::Value { .. } => "ValueError",
            LangError::Type { .. } => "TypeError",
            LangError::DivideByZero { .. } => "DivideByZeroError",
        }
    }

    pub fn line(&self) -> usize {
        match self {
            LangError::Syntax { line, .. }
            | LangError::Value { line, .. }
            | LangError::Type { line, .. }
            | LangError::DivideByZero { line, .. } => *line,
        }
    }

    pub fn col(&self) -> usize {
        match self {
            LangError::Syntax { col, .. }
            | LangError::Value { col, .. }
            | LangError::Type { col, .. }
            | LangError::DivideByZero { col, .. } => *col,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LangError::Syntax { message, .. }
            | LangError::Value { message, .. }
            | LangError::Type { message, .. }
            | LangError::DivideByZero { message, .. } => message,
        }
    }
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}:{}", self.kind(), self.message(), self.line(), self.col())
    }
}

impl std::error::Error for LangError {}

pub type LangResult<T> = Result<T, LangError>;

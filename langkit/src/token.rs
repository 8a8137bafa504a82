//! The token model (spec ch. 3): a node of both the lexical stream and
//! the syntax tree. The parser reuses token nodes as AST nodes, so a
//! `Token`'s `children` are its AST children once a parselet has run.

use std::fmt;
use std::rc::Rc;

use crate::error::LangResult;
use crate::parser::Parser;

/// An opaque string key identifying a lexical class. Reserved symbols
/// are parenthesized by convention so user-defined operators can never
/// collide with them.
pub type Symbol = &'static str;

pub const NAME: Symbol = "(NAME)";
pub const EOF: Symbol = "(EOF)";
pub const STRING: Symbol = "(STRING)";
pub const INT: Symbol = "(INT)";
pub const FLOAT: Symbol = "(FLOAT)";
pub const BLOCK: Symbol = "(BLOCK)";
pub const ELSEIF: Symbol = "(ELSEIF)";
pub const FUNCTION_INVOCATION: Symbol = "(FUNCTIONINVOCATION)";
pub const FUNCTION_DEFINITION: Symbol = "(FUNCTIONDEFINITION)";
pub const FUNCTION_PARAMETERS: Symbol = "(FUNCTIONPARAMETERS)";

/// Null-denotation: invoked when a token appears with no expression to
/// its left (literals, prefix operators, openers, identifiers). The
/// elided lifetime on `Parser<'_>` is a higher-ranked bound: a nud must
/// work for whatever parser lifetime it is called with, since the same
/// `Rc`-shared closure is reused across every lexer/parser built over
/// a registry.
pub type NudFn = Rc<dyn Fn(Token, &mut Parser<'_, '_>) -> LangResult<Token>>;
/// Left-denotation: invoked when a token appears after an already
/// parsed left expression (infix/postfix operators, call/index forms).
pub type LedFn = Rc<dyn Fn(Token, &mut Parser<'_, '_>, Token) -> LangResult<Token>>;
/// Statement-denotation: invoked when a token opens a statement.
pub type StdFn = Rc<dyn Fn(Token, &mut Parser<'_, '_>) -> LangResult<Token>>;

/// A template token lives in the registry for the lifetime of the
/// process; a runtime token is a clone of a template stamped with a
/// concrete value and position. Parselets are `Rc`-shared across every
/// token cloned from the same template, never duplicated per instance.
#[derive(Clone)]
pub struct Token {
    pub symbol: Symbol,
    pub value: String,
    pub arity: usize,
    pub binding_power: u32,
    pub line: usize,
    pub col: usize,
    pub children: Vec<Token>,
    pub nud: Option<NudFn>,
    pub led: Option<LedFn>,
    pub std: Option<StdFn>,
}

impl Token {
    pub fn new(symbol: Symbol) -> Self {
        Token {
            symbol,
            value: String::new(),
            arity: 0,
            binding_power: 0,
            line: 0,
            col: 0,
            children: Vec::new(),
            nud: None,
            led: None,
            std: None,
        }
    }

    /// Stamp a concrete value and position onto a clone of this
    /// template, the way `GenerateToken` does in the source language.
    pub fn stamp(&self, value: impl Into<String>, line: usize, col: usize) -> Token {
        Token {
            symbol: self.symbol,
            value: value.into(),
            arity: self.arity,
            binding_power: self.binding_power,
            line,
            col,
            children: Vec::new(),
            nud: self.nud.clone(),
            led: self.led.clone(),
            std: self.std.clone(),
        }
    }

    pub fn eof(line: usize, col: usize) -> Token {
        Token {
            symbol: EOF,
            value: String::new(),
            arity: 0,
            binding_power: 0,
            line,
            col,
            children: Vec::new(),
            nud: None,
            led: None,
            std: None,
        }
    }

    pub fn tree_string(&self, indent: usize) -> String {
        let mut out = String::new();
        for _ in 0..indent {
            out.push_str("  ");
        }
        out.push_str(&format!(
            "{{symbol:{}, value:{:?}, bindingPower:{}, arity:{}}}\n",
            self.symbol, self.value, self.binding_power, self.arity
        ));
        for child in &self.children {
            out.push_str(&child.tree_string(indent + 1));
        }
        out
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("symbol", &self.symbol)
            .field("value", &self.value)
            .field("arity", &self.arity)
            .field("binding_power", &self.binding_power)
            .field("line", &self.line)
            .field("col", &self.col)
            .field("children", &self.children)
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree_string(0))
    }
}

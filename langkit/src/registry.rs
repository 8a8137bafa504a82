//! The language registry (spec sec. 4.1): a process-local mapping from
//! [`Symbol`] to a template [`Token`] carrying binding power, arity and
//! parselets, plus quote, statement-terminator and block-delimiter
//! tables. Grounded in `language_specification.go` from the original
//! source and in the teacher's `registry.rs`/`kernel/registry.rs`
//! split between a token table and convenience `define*` builders.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::trace;

use crate::parser::Parser;
use crate::token::{LedFn, NudFn, StdFn, Symbol, Token, FLOAT, INT, NAME};

/// An opening/closing quote pair and the literal symbol a quoted run
/// lexes to.
#[derive(Debug, Clone, Copy)]
pub struct QuoteSpec {
    pub open: char,
    pub close: char,
    pub literal_symbol: Symbol,
}

/// The canonical symbol table. Populated at language-definition time,
/// then treated as immutable for the lifetime of every lexer/parser
/// built over it (spec sec. 5).
#[derive(Default)]
pub struct Registry {
    symbols: HashMap<Symbol, Token>,
    quotes: HashMap<char, QuoteSpec>,
    statement_terminators: HashSet<Symbol>,
    block_open: HashSet<Symbol>,
    block_close: HashMap<Symbol, Symbol>,
    block_close_set: HashSet<Symbol>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        registry.define_value(NAME);
        registry.define_value(INT);
        registry.define_value(FLOAT);
        registry
    }

    pub fn is_defined(&self, symbol: Symbol) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Primitive registration. Merges into an existing template per
    /// the rule in spec sec. 4.1: binding power is replaced only if
    /// strictly greater, each parselet slot is filled only if empty,
    /// arity is left untouched on a merge.
    pub fn define(
        &mut self,
        symbol: Symbol,
        binding_power: u32,
        arity: usize,
        nud: Option<NudFn>,
        led: Option<LedFn>,
        std: Option<StdFn>,
    ) {
        if let Some(existing) = self.symbols.get_mut(symbol) {
            if nud.is_some() && existing.nud.is_none() {
                existing.nud = nud;
            }
            if led.is_some() && existing.led.is_none() {
                existing.led = led;
            }
            if std.is_some() && existing.std.is_none() {
                existing.std = std;
            }
            if binding_power > existing.binding_power {
                existing.binding_power = binding_power;
            }
        } else {
            let mut template = Token::new(symbol);
            template.binding_power = binding_power;
            template.arity = arity;
            template.nud = nud;
            template.led = led;
            template.std = std;
            self.symbols.insert(symbol, template);
        }
    }

    pub fn define_infix(&mut self, symbol: Symbol, binding_power: u32) {
        let led: LedFn = Rc::new(|mut t: Token, parser: &mut Parser, left: Token| {
            let rbp = t.binding_power;
            t.children.push(left);
            t.children.push(parser.expression(rbp)?);
            Ok(t)
        });
        self.define(symbol, binding_power, 2, None, Some(led), None);
    }

    pub fn define_prefix(&mut self, symbol: Symbol, binding_power: u32) {
        let nud: NudFn = Rc::new(move |mut t: Token, parser: &mut Parser| {
            t.children.push(parser.expression(binding_power)?);
            Ok(t)
        });
        self.define(symbol, binding_power, 1, Some(nud), None, None);
    }

    /// Registers a symbol whose `nud` returns the token unchanged:
    /// identifiers, literals, and closing delimiters that must be
    /// lexable but never start an expression except trivially.
    pub fn define_value(&mut self, symbol: Symbol) {
        let nud: NudFn = Rc::new(|t: Token, _parser: &mut Parser| Ok(t));
        self.define(symbol, 0, 0, Some(nud), None, None);
    }

    pub fn define_parens(&mut self, open: Symbol, close: Symbol) {
        let nud: NudFn = Rc::new(|_t: Token, parser: &mut Parser| parser.expression(0));
        self.define(open, 0, 0, Some(nud), None, None);
        self.define_value(close);
    }

    pub fn define_quotes(&mut self, open: char, close: char, literal_symbol: Symbol) {
        self.quotes.insert(open, QuoteSpec { open, close, literal_symbol });
        self.define_value(literal_symbol);
    }

    pub fn quote_spec(&self, open: char) -> Option<QuoteSpec> {
        self.quotes.get(&open).copied()
    }

    pub fn define_statement_terminator(&mut self, symbol: Symbol) {
        self.statement_terminators.insert(symbol);
        self.define(symbol, 0, 0, None, None, None);
    }

    pub fn is_statement_terminator(&self, symbol: Symbol) -> bool {
        self.statement_terminators.contains(symbol)
    }

    /// Registers a symbol with no parselets: it is recognized by the
    /// lexer but must never appear where the parser needs a nud/led.
    pub fn define_empty(&mut self, symbol: Symbol) {
        self.define(symbol, 0, 0, None, None, None);
    }

    /// Marks a delimiter pair as a block. The parser's `block()`
    /// expects `open`, parses statements until `close`, and returns a
    /// synthetic `(BLOCK)` token.
    pub fn define_block(&mut self, open: Symbol, close: Symbol) {
        self.block_open.insert(open);
        self.block_close.insert(open, close);
        self.block_close_set.insert(close);
        if !self.is_defined(open) {
            self.define_empty(open);
        }
        if !self.is_defined(close) {
            self.define_empty(close);
        }
    }

    pub fn is_block_start(&self, symbol: Symbol) -> bool {
        self.block_open.contains(symbol)
    }

    pub fn is_any_block_end(&self, symbol: Symbol) -> bool {
        self.block_close_set.contains(symbol)
    }

    pub fn block_close_for(&self, open: Symbol) -> Option<Symbol> {
        self.block_close.get(open).copied()
    }

    pub fn define_statement(&mut self, symbol: Symbol, std: StdFn) {
        self.define(symbol, 0, 0, None, None, Some(std));
    }

    /// Clones the template for `symbol`, stamping the concrete value
    /// and position. Returns `None` if the symbol is unregistered.
    pub fn generate_token(&self, symbol: Symbol, value: impl Into<String>, line: usize, col: usize) -> Option<Token> {
        let template = self.symbols.get(symbol)?;
        trace!("generate_token {symbol} at {line}:{col}");
        Some(template.stamp(value, line, col))
    }

    /// Looks up the template whose registered key equals `key`,
    /// without requiring `key` to be a `'static` string: the returned
    /// template's own `symbol` field is already the registered
    /// `&'static str`, so callers stamp through it rather than through
    /// the borrowed search key.
    pub fn template_for(&self, key: &str) -> Option<&Token> {
        self.symbols.get(key)
    }

    pub fn eof(&self, line: usize, col: usize) -> Token {
        Token::eof(line, col)
    }

    /// A character is an identifier character iff it is neither
    /// whitespace nor the single-character form of a registered
    /// symbol.
    pub fn is_identifier_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        let as_str = c.encode_utf8(&mut buf);
        if self.symbols.contains_key(as_str as &str) {
            return false;
        }
        !c.is_whitespace()
    }

    /// An identifier *start* character is an identifier character that
    /// is not a digit.
    pub fn is_identifier_start_char(&self, c: char) -> bool {
        self.is_identifier_char(c) && !c.is_ascii_digit() && !c.is_numeric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_raises_binding_power_but_never_lowers_it() {
        let mut reg = Registry::new();
        reg.define("+", 10, 2, None, None, None);
        reg.define("+", 60, 2, None, None, None);
        assert_eq!(reg.template_for("+").unwrap().binding_power, 60);
        reg.define("+", 5, 2, None, None, None);
        assert_eq!(reg.template_for("+").unwrap().binding_power, 60);
    }

    #[test]
    fn define_fills_only_empty_parselet_slots() {
        let mut reg = Registry::new();
        let first: NudFn = Rc::new(|t, _p| Ok(t));
        let second: NudFn = Rc::new(|t, _p| Ok(t));
        reg.define("x", 0, 0, Some(first), None, None);
        reg.define("x", 0, 0, Some(second), None, None);
        assert!(reg.template_for("x").unwrap().nud.is_some());
        assert!(Rc::ptr_eq(
            reg.template_for("x").unwrap().nud.as_ref().unwrap(),
            &reg.template_for("x").unwrap().nud.clone().unwrap(),
        ));
    }

    #[test]
    fn block_tables_track_open_close_pairs() {
        let mut reg = Registry::new();
        reg.define_block("{", "}");
        assert!(reg.is_block_start("{"));
        assert!(reg.is_any_block_end("}"));
        assert!(!reg.is_any_block_end("{"));
        assert_eq!(reg.block_close_for("{"), Some("}"));
    }

    #[test]
    fn generate_token_is_none_for_unregistered_symbol() {
        let reg = Registry::new();
        assert!(reg.generate_token("nope", "nope", 1, 1).is_none());
    }

    #[test]
    fn identifier_characters_exclude_registered_operators() {
        let mut reg = Registry::new();
        reg.define_infix("+", 60);
        assert!(!reg.is_identifier_char('+'));
        assert!(reg.is_identifier_char('x'));
        assert!(!reg.is_identifier_start_char('1'));
    }
}

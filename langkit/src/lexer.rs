//! The streaming lexer (spec sec. 4.3): a character-stream state
//! machine producing a lazy, one-token-lookahead sequence of tokens
//! ending in exactly one `(EOF)`. Grounded in `lexer.go`'s refactored
//! `TDOPLexer` (the Open Questions section of the spec says to follow
//! this version, not the legacy single-file `tdop.go`), restructured
//! the way the teacher splits lexer state out of `kernel/lexer.rs`.

use std::io::Read;

use log::trace;

use crate::error::{LangError, LangResult};
use crate::registry::Registry;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    Unknown,
    Whitespace,
    Name,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Eof,
}

/// Decodes a `Read` stream one Unicode scalar at a time. The contract
/// in spec sec. 6 is scalar-at-a-time with end-of-stream detection; no
/// BOM handling is performed, matching the Go source's bare
/// `io.RuneReader`.
struct CharReader<'a> {
    inner: Box<dyn Read + 'a>,
}

impl<'a> CharReader<'a> {
    fn new(inner: impl Read + 'a) -> Self {
        CharReader { inner: Box::new(inner) }
    }

    fn read_char(&mut self) -> LangResult<Option<char>> {
        let mut buf = [0u8; 4];
        let Some(len) = self.read_one_byte(&mut buf)? else {
            return Ok(None);
        };
        let width = utf8_width(buf[0]);
        if width == 0 {
            return Err(LangError::syntax("invalid UTF-8 in source", 0, 0));
        }
        for slot in buf.iter_mut().take(width).skip(len) {
            let mut one = [0u8; 1];
            match self.inner.read(&mut one) {
                Ok(0) => return Err(LangError::syntax("unexpected EOF decoding UTF-8", 0, 0)),
                Ok(_) => *slot = one[0],
                Err(e) => return Err(LangError::syntax(format!("io error: {e}"), 0, 0)),
            }
        }
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| LangError::syntax("invalid UTF-8 in source", 0, 0))
    }

    fn read_one_byte(&mut self, buf: &mut [u8; 4]) -> LangResult<Option<usize>> {
        let mut one = [0u8; 1];
        match self.inner.read(&mut one) {
            Ok(0) => Ok(None),
            Ok(_) => {
                buf[0] = one[0];
                Ok(Some(1))
            }
            Err(e) => Err(LangError::syntax(format!("io error: {e}"), 0, 0)),
        }
    }
}

fn utf8_width(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        0
    }
}

pub struct Lexer<'a> {
    reader: CharReader<'a>,
    registry: &'a Registry,
    cached_token: Option<Token>,
    line: usize,
    col: usize,
    buffer: String,
    state: LexerState,
    token_start_col: usize,
    token_start_line: usize,
    current_quote: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(reader: impl Read + 'a, registry: &'a Registry) -> Self {
        Lexer {
            reader: CharReader::new(reader),
            registry,
            cached_token: None,
            line: 1,
            col: 0,
            buffer: String::new(),
            state: LexerState::Unknown,
            token_start_col: 0,
            token_start_line: 1,
            current_quote: None,
        }
    }

    pub fn is_statement_terminator(&self, token: &Token) -> bool {
        self.registry.is_statement_terminator(token.symbol)
    }

    pub fn is_block_start(&self, token: &Token) -> bool {
        self.registry.is_block_start(token.symbol)
    }

    pub fn is_any_block_end(&self, token: &Token) -> bool {
        self.registry.is_any_block_end(token.symbol)
    }

    fn syntax_error(&self, msg: impl Into<String>) -> LangError {
        LangError::syntax(msg, self.line, self.col)
    }

    fn read_char(&mut self) -> LangResult<Option<char>> {
        let c = self.reader.read_char()?;
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        Ok(c)
    }

    fn start_of_token(&mut self, c: char) {
        if let Some(spec) = self.registry.quote_spec(c) {
            self.state = LexerState::StringLiteral;
            self.token_start_col = self.col;
            self.token_start_line = self.line;
            self.current_quote = Some(spec.open);
        } else if self.registry.is_identifier_start_char(c) {
            self.state = LexerState::Name;
            self.token_start_col = self.col;
            self.token_start_line = self.line;
            self.buffer.push(c);
        } else if c.is_ascii_digit() {
            self.state = LexerState::IntLiteral;
            self.token_start_col = self.col;
            self.token_start_line = self.line;
            self.buffer.push(c);
        } else if c.is_whitespace() {
            self.state = LexerState::Whitespace;
        } else {
            self.state = LexerState::Operator;
            self.token_start_col = self.col;
            self.token_start_line = self.line;
            self.buffer.push(c);
        }
    }

    /// Resolves the literal states (`next()` dispatches `Name` and
    /// `Operator` to `end_name_token`/`end_operator_token` directly,
    /// since those need registry lookups by borrowed `&str` rather than
    /// a plain `generate_token` by fixed symbol).
    fn end_of_token(&mut self) -> LangResult<Token> {
        use crate::token::{FLOAT, INT, STRING};
        let (line, col) = (self.token_start_line, self.token_start_col);
        match self.state {
            LexerState::StringLiteral => {
                let quote = self.current_quote.ok_or_else(|| {
                    self.syntax_error("invalid quoted literal with no active quote")
                })?;
                if self.registry.quote_spec(quote).is_none() {
                    return Err(self.syntax_error(format!("invalid quoted literal with quote {quote}")));
                }
                let value = std::mem::take(&mut self.buffer);
                self.registry
                    .generate_token(STRING, value, line, col)
                    .ok_or_else(|| self.syntax_error("(STRING) is not registered"))
            }
            LexerState::IntLiteral => {
                let value = std::mem::take(&mut self.buffer);
                self.registry
                    .generate_token(INT, value, line, col)
                    .ok_or_else(|| self.syntax_error("(INT) is not registered"))
            }
            LexerState::FloatLiteral => {
                let value = std::mem::take(&mut self.buffer);
                self.registry
                    .generate_token(FLOAT, value, line, col)
                    .ok_or_else(|| self.syntax_error("(FLOAT) is not registered"))
            }
            LexerState::Name | LexerState::Operator => {
                unreachable!("next() resolves Name/Operator via end_name_token/end_operator_token")
            }
            LexerState::Whitespace => Err(self.syntax_error("attempted to resolve token in whitespace")),
            LexerState::Unknown | LexerState::Eof => {
                Err(self.syntax_error("attempted to resolve token in invalid lexer state"))
            }
        }
    }

    fn resolve_name_or_keyword(&self, value: &str, line: usize, col: usize) -> LangResult<Token> {
        use crate::token::NAME;
        if let Some(tok) = self.registry.template_for(value) {
            Ok(tok.stamp(value, line, col))
        } else {
            self.registry
                .generate_token(NAME, value, line, col)
                .ok_or_else(|| self.syntax_error("(NAME) is not registered"))
        }
    }

    pub fn next(&mut self) -> LangResult<Token> {
        if let Some(token) = self.cached_token.take() {
            return Ok(token);
        }

        while let Some(c) = self.read_char()? {
            let mut produced: Option<Token> = None;

            match self.state {
                LexerState::Unknown | LexerState::Whitespace => {
                    if !c.is_whitespace() {
                        self.start_of_token(c);
                    }
                }
                LexerState::IntLiteral => {
                    if c.is_ascii_digit() {
                        self.buffer.push(c);
                    } else if c == '.' {
                        self.state = LexerState::FloatLiteral;
                        self.buffer.push(c);
                    } else {
                        produced = Some(self.end_of_token()?);
                        self.start_of_token(c);
                    }
                }
                LexerState::FloatLiteral => {
                    if c.is_ascii_digit() {
                        self.buffer.push(c);
                    } else {
                        produced = Some(self.end_of_token()?);
                        self.start_of_token(c);
                    }
                }
                LexerState::StringLiteral => {
                    let quote = self.current_quote.expect("stringLiteral state implies a quote");
                    let spec = self.registry.quote_spec(quote).expect("quote spec must exist");
                    if c == spec.close {
                        produced = Some(self.end_of_token()?);
                        self.state = LexerState::Unknown;
                    } else if c == '\n' {
                        return Err(self.syntax_error("new line in middle of string literal"));
                    } else {
                        self.buffer.push(c);
                    }
                }
                LexerState::Name => {
                    if self.registry.is_identifier_char(c) {
                        self.buffer.push(c);
                    } else {
                        produced = Some(self.end_name_token()?);
                        self.start_of_token(c);
                    }
                }
                LexerState::Operator => {
                    let mut candidate = self.buffer.clone();
                    candidate.push(c);
                    if self.registry.template_for(&candidate).is_some() {
                        self.buffer.push(c);
                    } else if self.registry.template_for(&self.buffer).is_some() {
                        produced = Some(self.end_operator_token()?);
                        self.start_of_token(c);
                    } else {
                        return Err(self.syntax_error(format!("unrecognized operator {c}")));
                    }
                }
                LexerState::Eof => unreachable!("Eof state only reached after loop exit"),
            }

            if let Some(token) = produced {
                trace!("lexer emitted {:?} at {}:{}", token.symbol, token.line, token.col);
                return Ok(token);
            }
        }

        match self.state {
            LexerState::StringLiteral => Err(self.syntax_error("unexpected EOF in string literal")),
            LexerState::Eof => Ok(self.registry.eof(self.line, self.col)),
            _ => {
                if !self.buffer.is_empty() {
                    let token = match self.state {
                        LexerState::Name => self.end_name_token()?,
                        LexerState::Operator => self.end_operator_token()?,
                        _ => self.end_of_token()?,
                    };
                    self.state = LexerState::Eof;
                    Ok(token)
                } else {
                    self.state = LexerState::Eof;
                    Ok(self.registry.eof(self.line, self.col))
                }
            }
        }
    }

    fn end_name_token(&mut self) -> LangResult<Token> {
        let (line, col) = (self.token_start_line, self.token_start_col);
        let value = std::mem::take(&mut self.buffer);
        self.resolve_name_or_keyword(&value, line, col)
    }

    fn end_operator_token(&mut self) -> LangResult<Token> {
        let (line, col) = (self.token_start_line, self.token_start_col);
        let value = std::mem::take(&mut self.buffer);
        self.registry
            .template_for(&value)
            .map(|tok| tok.stamp(value.clone(), line, col))
            .ok_or_else(|| self.syntax_error(format!("unrecognized operator {value}")))
    }

    pub fn peek(&mut self) -> LangResult<Token> {
        let token = self.next()?;
        self.cached_token = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::token::{EOF, FLOAT, INT, NAME, STRING};

    fn test_registry() -> Registry {
        let mut reg = Registry::new();
        reg.define_infix("+", 60);
        reg.define_infix("=", 30);
        reg.define_infix("==", 50);
        reg.define_parens("(", ")");
        reg.define_quotes('"', '"', STRING);
        reg.define_statement_terminator(";");
        reg
    }

    fn all_tokens(src: &str, reg: &Registry) -> Vec<Token> {
        let mut lexer = Lexer::new(src.as_bytes(), reg);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next().expect("lexing should not fail");
            let done = tok.symbol == EOF;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn tokenization_is_total_and_ends_in_exactly_one_eof() {
        let reg = test_registry();
        let tokens = all_tokens("A = 1 + 2.5;", &reg);
        let eofs = tokens.iter().filter(|t| t.symbol == EOF).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().unwrap().symbol, EOF);
    }

    #[test]
    fn positions_are_monotonic_non_decreasing() {
        let reg = test_registry();
        let tokens = all_tokens("A = 1 + 2.5;", &reg);
        for pair in tokens.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!((b.line, b.col) >= (a.line, a.col), "{:?} then {:?}", a, b);
        }
    }

    #[test]
    fn peek_is_idempotent() {
        let reg = test_registry();
        let mut lexer = Lexer::new("A = 1".as_bytes(), &reg);
        let first = lexer.peek().unwrap();
        let second = lexer.peek().unwrap();
        assert_eq!(first.symbol, second.symbol);
        assert_eq!(first.value, second.value);
        let next = lexer.next().unwrap();
        assert_eq!(next.value, first.value);
    }

    #[test]
    fn maximal_munch_prefers_longer_operator() {
        let reg = test_registry();
        let tokens = all_tokens("A == B", &reg);
        assert_eq!(tokens[1].symbol, "==");
    }

    #[test]
    fn first_token_starts_at_column_one() {
        let reg = test_registry();
        let tokens = all_tokens("A = 1", &reg);
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
    }

    #[test]
    fn literal_kinds_classify_correctly() {
        let reg = test_registry();
        let tokens = all_tokens(r#"A 1 2.5 "hi""#, &reg);
        assert_eq!(tokens[0].symbol, NAME);
        assert_eq!(tokens[1].symbol, INT);
        assert_eq!(tokens[2].symbol, FLOAT);
        assert_eq!(tokens[3].symbol, STRING);
        assert_eq!(tokens[3].value, "hi");
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        let reg = test_registry();
        let mut lexer = Lexer::new("\"abc".as_bytes(), &reg);
        let err = lexer.next().unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
    }

    #[test]
    fn newline_inside_string_is_a_syntax_error() {
        let reg = test_registry();
        let mut lexer = Lexer::new("\"abc\ndef\"".as_bytes(), &reg);
        let err = lexer.next().unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
    }
}

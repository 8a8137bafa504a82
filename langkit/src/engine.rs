//! The engine façade (spec sec. 4.5): wires a `Lexer`/`Parser` over one
//! source stream into an `Evaluator`. Grounded in `interpreter.go`'s
//! `EngineImpl`/`NewEngine`, except per-statement evaluation replaces
//! the Go prototype's single whole-program `Expression(0)` call (see
//! DESIGN.md for why `toyscript.go` never exercised that distinction).

use std::io::Read;

use crate::error::LangResult;
use crate::evaluator::{Evaluator, Value, Variables};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::registry::Registry;

pub struct Engine<'r, E: Evaluator> {
    registry: &'r Registry,
    evaluator: E,
}

impl<'r, E: Evaluator> Engine<'r, E> {
    pub fn new(registry: &'r Registry, evaluator: E) -> Self {
        Engine { registry, evaluator }
    }

    pub fn execute(&mut self, source: impl Read + 'r) -> LangResult<Value> {
        let mut globals = Variables::new();
        self.execute_with_globals(source, &mut globals)
    }

    pub fn execute_with_globals(
        &mut self,
        source: impl Read + 'r,
        globals: &mut Variables,
    ) -> LangResult<Value> {
        let mut lexer = Lexer::new(source, self.registry);
        let statements = {
            let mut parser = Parser::new(&mut lexer);
            parser.statements()?
        };
        let mut result = Value::Null;
        for statement in &statements {
            result = self.evaluator.evaluate(statement, globals)?;
        }
        Ok(result)
    }
}

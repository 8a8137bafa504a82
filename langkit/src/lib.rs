//! A toolkit for defining small expression/statement languages: a
//! registry-driven lexer and TDOP parser over a pluggable tree-walking
//! evaluator. See `registry`, `lexer`, and `parser` for the pieces a
//! language author wires together, and `evaluator`/`engine` for
//! running the result.

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod token;

pub use engine::Engine;
pub use error::{LangError, LangResult};
pub use evaluator::{Builtin, BuiltinsRegistry, Evaluator, Value, Variables};
pub use lexer::Lexer;
pub use parser::Parser;
pub use registry::{QuoteSpec, Registry};
pub use token::{
    Symbol, Token, BLOCK, ELSEIF, EOF, FLOAT, FUNCTION_DEFINITION, FUNCTION_INVOCATION,
    FUNCTION_PARAMETERS, INT, NAME, STRING,
};

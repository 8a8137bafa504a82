//! Builtins and user-defined functions (grounded in
//! `toyscript/engine/functioncalls.go`'s `callFunction`, which looks a
//! call up in the builtins table first and falls back to user-defined
//! functions, with no arity check on builtins but a strict one on
//! user-defined calls).

use std::collections::HashMap;

use langkit::{LangError, Token, Value};

pub struct UserFunction {
    pub parameters: Vec<String>,
    pub body: Token,
}

type BuiltinFn = Box<dyn Fn(&[Value]) -> Result<Value, LangError>>;

#[derive(Default)]
pub struct Functions {
    builtins: HashMap<String, BuiltinFn>,
    user_defined: HashMap<String, UserFunction>,
}

impl Functions {
    pub fn new() -> Self {
        let mut functions = Functions::default();
        functions.define_builtin("print", print_builtin);
        functions
    }

    pub fn define_builtin(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, LangError> + 'static,
    ) {
        self.builtins.insert(name.into(), Box::new(func));
    }

    pub fn define_user_function(&mut self, name: String, parameters: Vec<String>, body: Token) {
        self.user_defined.insert(name, UserFunction { parameters, body });
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn user_function(&self, name: &str) -> Option<&UserFunction> {
        self.user_defined.get(name)
    }

    /// Builtins are called with no arity check (`print` is variadic);
    /// this path is only reached once `is_builtin` has already matched.
    pub fn call_builtin(&self, name: &str, args: &[Value], line: usize, col: usize) -> Result<Value, LangError> {
        match self.builtins.get(name) {
            Some(func) => func(args),
            None => Err(LangError::value(format!("undefined function {name}"), line, col)),
        }
    }
}

pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int64(n) => n.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::String(s) => s.clone(),
    }
}

fn print_builtin(args: &[Value]) -> Result<Value, LangError> {
    let rendered: Vec<String> = args.iter().map(to_display_string).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_builtin_call_is_a_value_error() {
        let functions = Functions::new();
        let err = functions.call_builtin("nope", &[], 1, 1).unwrap_err();
        assert_eq!(err.kind(), "ValueError");
    }

    #[test]
    fn print_is_registered_and_accepts_any_arity() {
        let functions = Functions::new();
        assert!(functions.is_builtin("print"));
        assert!(functions.call_builtin("print", &[], 1, 1).is_ok());
        assert!(functions
            .call_builtin("print", &[Value::Int64(1), Value::Int64(2)], 1, 1)
            .is_ok());
    }
}

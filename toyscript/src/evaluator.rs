//! The toyscript tree-walker (grounded in
//! `toyscript/engine/engine.go`'s `ToyScriptInterpreter.Evaluate` switch,
//! `loops.go`'s `doWhile`, and `functioncalls.go`'s `callFunction`).

use langkit::{Evaluator, LangError, LangResult, Token, Value, Variables, BLOCK, ELSEIF, NAME};

use crate::booleans::{bool_value, truthy};
use crate::functions::Functions;
use crate::language_spec::{FALSE, TRUE};
use crate::operators;

pub struct ToyscriptEvaluator {
    functions: Functions,
}

impl Default for ToyscriptEvaluator {
    fn default() -> Self {
        ToyscriptEvaluator { functions: Functions::new() }
    }
}

impl ToyscriptEvaluator {
    pub fn new() -> Self {
        ToyscriptEvaluator::default()
    }

    fn evaluate_block(&mut self, block: &Token, vars: &mut Variables) -> LangResult<Value> {
        let mut result = Value::Null;
        for statement in &block.children {
            result = self.evaluate(statement, vars)?;
        }
        Ok(result)
    }

    fn evaluate_if(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        let condition = self.evaluate(&tree.children[0], vars)?;
        if truthy(&condition) {
            return self.evaluate_block(&tree.children[1], vars);
        }
        match tree.children.get(2) {
            Some(branch) if branch.symbol == ELSEIF => self.evaluate_if(branch, vars),
            Some(else_block) => self.evaluate_block(else_block, vars),
            None => Ok(Value::Null),
        }
    }

    /// Re-evaluates the condition every iteration; returns `Null` if the
    /// loop body never ran, otherwise the last iteration's value
    /// (grounded in `doWhile`).
    fn evaluate_while(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        let mut result = Value::Null;
        loop {
            let condition = self.evaluate(&tree.children[0], vars)?;
            if !truthy(&condition) {
                break;
            }
            result = self.evaluate_block(&tree.children[1], vars)?;
        }
        Ok(result)
    }

    fn evaluate_function_definition(&mut self, tree: &Token) -> LangResult<Value> {
        let name = tree.children[0].value.clone();
        let parameters = tree.children[1]
            .children
            .iter()
            .map(|p| p.value.clone())
            .collect::<Vec<_>>();
        let body = tree.children[2].clone();
        self.functions.define_user_function(name, parameters, body);
        Ok(Value::Null)
    }

    fn evaluate_function_invocation(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        let callee = &tree.children[0];
        let name = callee.value.as_str();
        let mut args = Vec::with_capacity(tree.children.len() - 1);
        for arg in &tree.children[1..] {
            args.push(self.evaluate(arg, vars)?);
        }

        if self.functions.is_builtin(name) {
            return self.functions.call_builtin(name, &args, tree.line, tree.col);
        }

        let (parameters, body) = match self.functions.user_function(name) {
            Some(f) => (f.parameters.clone(), f.body.clone()),
            None => {
                return Err(LangError::value(format!("undefined function {name}"), tree.line, tree.col));
            }
        };
        if parameters.len() != args.len() {
            return Err(LangError::value(
                format!("{} expects {} argument(s), got {}", name, parameters.len(), args.len()),
                tree.line,
                tree.col,
            ));
        }

        // User-defined calls get a fresh, isolated scope; toyscript has
        // no closures over the caller's variables.
        let mut call_scope = Variables::new();
        for (param, value) in parameters.into_iter().zip(args) {
            call_scope.insert(param, value);
        }
        self.evaluate_block(&body, &mut call_scope)
    }

    fn evaluate_assignment(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        let target = &tree.children[0];
        if target.symbol != NAME {
            return Err(LangError::syntax(
                format!("cannot assign to {}", target.value),
                target.line,
                target.col,
            ));
        }
        let value = self.evaluate(&tree.children[1], vars)?;
        vars.insert(target.value.clone(), value.clone());
        Ok(value)
    }

    fn evaluate_binary(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        let left = self.evaluate(&tree.children[0], vars)?;
        let right = self.evaluate(&tree.children[1], vars)?;
        match tree.symbol {
            "+" => operators::add(&left, &right, tree.line, tree.col),
            "-" => operators::subtract(&left, &right, tree.line, tree.col),
            "*" => operators::multiply(&left, &right, tree.line, tree.col),
            "/" => operators::divide(&left, &right, tree.line, tree.col),
            "%" => operators::modulo(&left, &right, tree.line, tree.col),
            "<" => operators::less_than(&left, &right, tree.line, tree.col),
            ">" => operators::greater_than(&left, &right, tree.line, tree.col),
            "<=" => operators::less_than_or_equal(&left, &right, tree.line, tree.col),
            ">=" => operators::greater_than_or_equal(&left, &right, tree.line, tree.col),
            "==" => Ok(operators::equals(&left, &right)),
            "!=" => Ok(operators::not_equals(&left, &right)),
            "&&" => Ok(operators::and(left, right)),
            "||" => Ok(operators::or(left, right)),
            other => Err(LangError::syntax(format!("unknown operator {other}"), tree.line, tree.col)),
        }
    }
}

impl Evaluator for ToyscriptEvaluator {
    fn evaluate(&mut self, tree: &Token, vars: &mut Variables) -> LangResult<Value> {
        match tree.symbol {
            langkit::INT => tree
                .value
                .parse::<i64>()
                .map(Value::Int64)
                .map_err(|_| LangError::syntax(format!("invalid integer {}", tree.value), tree.line, tree.col)),
            langkit::FLOAT => tree
                .value
                .parse::<f64>()
                .map(Value::Float64)
                .map_err(|_| LangError::syntax(format!("invalid float {}", tree.value), tree.line, tree.col)),
            langkit::STRING => Ok(Value::String(tree.value.clone())),
            TRUE => Ok(bool_value(true)),
            FALSE => Ok(bool_value(false)),
            NAME => vars
                .get(&tree.value)
                .cloned()
                .ok_or_else(|| LangError::value(format!("undefined variable {}", tree.value), tree.line, tree.col)),
            BLOCK => self.evaluate_block(tree, vars),
            "if" => self.evaluate_if(tree, vars),
            ELSEIF => self.evaluate_if(tree, vars),
            "while" => self.evaluate_while(tree, vars),
            langkit::FUNCTION_DEFINITION => self.evaluate_function_definition(tree),
            langkit::FUNCTION_INVOCATION => self.evaluate_function_invocation(tree, vars),
            "=" => self.evaluate_assignment(tree, vars),
            "!" => {
                let operand = self.evaluate(&tree.children[0], vars)?;
                Ok(operators::not(&operand))
            }
            "+" | "-" | "*" | "/" | "%" | "<" | ">" | "<=" | ">=" | "==" | "!=" | "&&" | "||" => {
                self.evaluate_binary(tree, vars)
            }
            other => Err(LangError::syntax(format!("cannot evaluate {other}"), tree.line, tree.col)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language_spec::build_registry;
    use langkit::Engine;

    fn run(src: &str) -> Value {
        let registry = build_registry();
        let mut engine = Engine::new(&registry, ToyscriptEvaluator::new());
        engine.execute(src.as_bytes()).expect("program should evaluate")
    }

    #[test]
    fn arithmetic_and_precedence() {
        assert_eq!(run("1 + 2 * 3;"), Value::Int64(7));
    }

    #[test]
    fn string_concatenation_is_tagged_string_not_float() {
        assert_eq!(run("\"a\" + \"b\";"), Value::String("ab".to_string()));
    }

    #[test]
    fn true_and_false_are_distinct_booleans() {
        assert_eq!(run("true;"), Value::Bool(true));
        assert_eq!(run("false;"), Value::Bool(false));
    }

    #[test]
    fn assignment_and_variable_lookup() {
        assert_eq!(run("x = 5; x + 1;"), Value::Int64(6));
    }

    #[test]
    fn and_or_are_not_short_circuiting_and_return_operand_values() {
        assert_eq!(run("0 && 5;"), Value::Int64(0));
        assert_eq!(run("3 || 0;"), Value::Int64(3));
        // `or` returns the left operand whenever either side is truthy.
        assert_eq!(run("0 || 7;"), Value::Int64(0));
        assert_eq!(run("3 && 5;"), Value::Int64(5));
    }

    #[test]
    fn if_else_chooses_the_right_branch() {
        assert_eq!(run("if (true) { 1; } else { 2; }"), Value::Int64(1));
        assert_eq!(run("if (false) { 1; } else { 2; }"), Value::Int64(2));
    }

    #[test]
    fn while_loop_accumulates_and_returns_null_when_it_never_runs() {
        assert_eq!(run("i = 0; while (i < 3) { i = i + 1; } i;"), Value::Int64(3));
        assert_eq!(run("while (false) { 1; }"), Value::Null);
    }

    #[test]
    fn user_defined_function_with_arity_checking() {
        assert_eq!(run("def add(a, b) { a + b; } add(2, 3);"), Value::Int64(5));
    }

    #[test]
    fn calling_a_user_function_with_wrong_arity_is_a_value_error() {
        let registry = build_registry();
        let mut engine = Engine::new(&registry, ToyscriptEvaluator::new());
        let err = engine
            .execute("def add(a, b) { a + b; } add(2);".as_bytes())
            .unwrap_err();
        assert_eq!(err.kind(), "ValueError");
    }

    #[test]
    fn division_by_zero_is_a_divide_by_zero_error() {
        let registry = build_registry();
        let mut engine = Engine::new(&registry, ToyscriptEvaluator::new());
        let err = engine.execute("1 / 0;".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "DivideByZeroError");
    }
}

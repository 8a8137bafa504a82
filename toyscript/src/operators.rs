//! Binary/unary operator semantics over already-evaluated operands
//! (grounded in `toyscript/engine/operators.go`).

use langkit::{LangError, LangResult, Value};

use crate::booleans::{bool_value, truthy};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int64(_) => "int",
        Value::Float64(_) => "float",
        Value::String(_) => "string",
    }
}

pub fn add(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_add(*b))),
        (Value::Float64(a), Value::Float64(b)) => Ok(Value::Float64(a + b)),
        // `language_spec.go`'s `doAddition` tags string concatenation as
        // `TFloat`, an evident copy-paste bug; this corrects it to `String`.
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (a, b) if type_name(a) == type_name(b) => Err(LangError::type_error(
            format!("type {} does not support operator +", type_name(a)),
            line,
            col,
        )),
        (a, b) => Err(LangError::type_error(
            format!("incompatible types {} and {} with operator +", type_name(a), type_name(b)),
            line,
            col,
        )),
    }
}

pub fn subtract(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_sub(*b))),
        (Value::Float64(a), Value::Float64(b)) => Ok(Value::Float64(a - b)),
        (a, b) if type_name(a) == type_name(b) => Err(LangError::type_error(
            format!("type {} does not support operator -", type_name(a)),
            line,
            col,
        )),
        (a, b) => Err(LangError::type_error(
            format!("incompatible types {} and {} with operator -", type_name(a), type_name(b)),
            line,
            col,
        )),
    }
}

pub fn multiply(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_mul(*b))),
        (Value::Float64(a), Value::Float64(b)) => Ok(Value::Float64(a * b)),
        (a, b) if type_name(a) == type_name(b) => Err(LangError::type_error(
            format!("type {} does not support operator *", type_name(a)),
            line,
            col,
        )),
        (a, b) => Err(LangError::type_error(
            format!("incompatible types {} and {} with operator *", type_name(a), type_name(b)),
            line,
            col,
        )),
    }
}

pub fn divide(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(_), Value::Int64(0)) => {
            Err(LangError::divide_by_zero("integer division by zero", line, col))
        }
        (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a / b)),
        (Value::Float64(_), Value::Float64(b)) if *b == 0.0 => {
            Err(LangError::divide_by_zero("float division by zero", line, col))
        }
        (Value::Float64(a), Value::Float64(b)) => Ok(Value::Float64(a / b)),
        (a, b) if type_name(a) == type_name(b) => Err(LangError::type_error(
            format!("type {} does not support operator /", type_name(a)),
            line,
            col,
        )),
        (a, b) => Err(LangError::type_error(
            format!("incompatible types {} and {} with operator /", type_name(a), type_name(b)),
            line,
            col,
        )),
    }
}

pub fn modulo(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(_), Value::Int64(0)) => {
            Err(LangError::divide_by_zero("integer modulo by zero", line, col))
        }
        (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a % b)),
        (a, b) if type_name(a) == type_name(b) => Err(LangError::type_error(
            format!("type {} does not support operator %", type_name(a)),
            line,
            col,
        )),
        (a, b) => Err(LangError::type_error(
            format!("incompatible types {} and {} with operator %", type_name(a), type_name(b)),
            line,
            col,
        )),
    }
}

pub fn less_than(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Ok(bool_value(a < b)),
        (Value::Float64(a), Value::Float64(b)) => Ok(bool_value(a < b)),
        (Value::String(a), Value::String(b)) => Ok(bool_value(a < b)),
        (a, b) if type_name(a) == type_name(b) => {
            Err(LangError::type_error(format!("type {} cannot be compared with <", type_name(a)), line, col))
        }
        _ => Err(LangError::type_error("attempted to compare incomparable types with <", line, col)),
    }
}

pub fn greater_than(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Ok(bool_value(a > b)),
        (Value::Float64(a), Value::Float64(b)) => Ok(bool_value(a > b)),
        (Value::String(a), Value::String(b)) => Ok(bool_value(a > b)),
        (a, b) if type_name(a) == type_name(b) => {
            Err(LangError::type_error(format!("type {} cannot be compared with >", type_name(a)), line, col))
        }
        _ => Err(LangError::type_error("attempted to compare incomparable types with >", line, col)),
    }
}

pub fn equals(left: &Value, right: &Value) -> Value {
    bool_value(left == right)
}

pub fn not_equals(left: &Value, right: &Value) -> Value {
    bool_value(left != right)
}

/// `<=`/`>=` are "equal or strictly ordered", exactly as
/// `doLessThanOrEqualTo`/`doGreaterThanOrEqualTo` express them, rather
/// than a native `<=` comparator.
pub fn less_than_or_equal(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    if let Value::Bool(true) = equals(left, right) {
        return Ok(bool_value(true));
    }
    less_than(left, right, line, col)
}

pub fn greater_than_or_equal(left: &Value, right: &Value, line: usize, col: usize) -> LangResult<Value> {
    if let Value::Bool(true) = equals(left, right) {
        return Ok(bool_value(true));
    }
    greater_than(left, right, line, col)
}

/// Non-short-circuiting: both operands are always evaluated before
/// `and`/`or` inspect truthiness (grounded in `doAnd`/`doOr`, which
/// resolve both operands unconditionally via `resolveBinaryOperands`).
/// Returns one of the two operand values, never a freshly built bool.
pub fn and(left: Value, right: Value) -> Value {
    if truthy(&left) && truthy(&right) {
        right
    } else {
        left
    }
}

pub fn or(left: Value, right: Value) -> Value {
    if truthy(&left) || truthy(&right) {
        left
    } else {
        right
    }
}

pub fn not(value: &Value) -> Value {
    bool_value(!truthy(value))
}

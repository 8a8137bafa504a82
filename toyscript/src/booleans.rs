//! Boolean and truthiness helpers (grounded in
//! `toyscript/engine/booleans.go`).

use langkit::Value;

pub fn bool_value(b: bool) -> Value {
    Value::Bool(b)
}

/// `Bool` as-is; numbers are falsy at zero; `String` falsy when empty;
/// `Null` always falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Int64(n) => *n != 0,
        Value::Float64(f) => *f != 0.0,
        Value::Null => false,
    }
}

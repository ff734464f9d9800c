//! Native built-in functions.
//!
//! A single name-to-callable registry, consulted by the evaluator only
//! after a user environment lookup misses. Adding a new built-in means
//! adding an arm to [`lookup`] and [`call`]; nothing else in the
//! evaluator needs to change, per the design note in §4.4.

use crate::eval::value::Value;

/// Returns a `Value::Builtin` handle if `name` names a known built-in,
/// so `Identifier` resolution can distinguish "unbound name" from
/// "bound to a native function" before a call ever happens.
pub fn lookup(name: &str) -> Option<Value> {
    match name {
        "len" => Some(Value::Builtin(name.to_string())),
        _ => None,
    }
}

/// Invokes the built-in named `name` with already-evaluated arguments.
pub fn call(name: &str, args: &[Value]) -> Value {
    match name {
        "len" => len(args),
        other => Value::Error(format!("unknown builtin: {other}")),
    }
}

fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "wrong number of arguments. got = {}, want = 1",
            args.len()
        ));
    }

    match &args[0] {
        Value::String(s) => Value::Integer(s.chars().count() as i64),
        Value::Array(items) => Value::Integer(items.len() as i64),
        other => Value::Error(format!(
            "argument to 'len' not supported, got {}",
            other.type_name()
        )),
    }
}

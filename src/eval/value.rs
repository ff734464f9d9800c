//! Runtime values and the lexical-scope environment chain.
//!
//! # Example
//!
//! ```rust
//! use monkey::eval::{Environment, Value};
//!
//! let env = Environment::new();
//! env.set("x", Value::Integer(5));
//! assert_eq!(env.get("x"), Some(Value::Integer(5)));
//! ```

use crate::ast::{BlockStatement, Identifier};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A runtime value produced by the evaluator.
///
/// `Boolean`/`Null` act as the spec's canonical singletons: their
/// payload is a plain `Copy` type, so value equality already *is*
/// identity equality here — no `Rc`-sharing is needed to get that
/// property for free. `Function` and `Environment` are the one place
/// shared ownership matters, since a closure's captured frame must
/// stay alive and mutable after the call that created it returns; see
/// [`Environment`].
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    ReturnValue(Box<Value>),
    Error(String),
    Function {
        parameters: Vec<Identifier>,
        body: Rc<BlockStatement>,
        env: Environment,
    },
    Array(Vec<Value>),
    /// Holds the built-in's name; dispatch happens in
    /// [`crate::eval::builtins::call`].
    Builtin(String),
}

impl Value {
    /// The type name used verbatim in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function { .. } => "FUNCTION",
            Value::Array(_) => "ARRAY",
            Value::Builtin(_) => "BUILTIN",
        }
    }

    /// The printable form shown by the REPL and by `Error`'s message.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR: {message}"),
            Value::Function {
                parameters, body, ..
            } => {
                let params: Vec<String> = parameters.iter().map(|p| p.name.clone()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), body)
            }
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(Value::inspect).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Builtin(_) => "builtin function".to_string(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// Manual `PartialEq`: `Function`/`Builtin` are never produced by the
/// evaluator's `==`/`!=` handling (that path reports "unknown operator"
/// before reaching here), so comparing them by content — which would
/// have to walk into `env` — is never actually exercised. Comparing by
/// identity instead avoids the risk of an infinite loop if a captured
/// environment ever referenced itself through a recursive binding.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function { env: a, .. }, Value::Function { env: b, .. }) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

struct EnvironmentData {
    store: HashMap<String, Value>,
    outer: Option<Environment>,
}

/// A lexical-scope chain.
///
/// Wraps `Rc<RefCell<_>>` rather than the value-semantics "clone the
/// parent" approach: a `Function` value captures this handle, not a
/// snapshot, so a `let` bound in a still-live outer frame *after* a
/// closure captured it — most importantly, a recursive function
/// binding its own name — remains visible to that closure. Cloning an
/// `Environment` clones the handle, not the bindings.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<EnvironmentData>>);

impl Environment {
    /// A fresh, parentless environment (program entry, or a REPL session).
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            store: HashMap::new(),
            outer: None,
        })))
    }

    /// A child scope enclosed over `outer`, created for each function call.
    pub fn enclosed(outer: &Environment) -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Walks the parent chain toward the root; the first match wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        let data = self.0.borrow();
        match data.store.get(name) {
            Some(value) => Some(value.clone()),
            None => data.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Always writes in this environment, never the chain: `let` introduces
    /// a fresh binding rather than mutating an outer one.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().store.insert(name.into(), value);
    }

    fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment(..)")
    }
}

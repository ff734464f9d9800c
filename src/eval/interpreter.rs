//! The tree-walking evaluator.
//!
//! `eval_program` is the only entry point a caller needs: it returns
//! `None` only for a program with zero statements (the "absent" result
//! the REPL is told not to print), and `Some(value)` otherwise — with
//! `ReturnValue` already unwrapped and `Error` surfaced as the result.
//!
//! # Example
//!
//! ```rust
//! use monkey::eval::{Environment, Evaluator};
//! use monkey::parser::Parser;
//!
//! let program = Parser::new(r#"let a = 5; let b = a; a + b + 5;"#).parse_program();
//! let result = Evaluator::new().eval_program(&program, &Environment::new());
//! assert_eq!(result.unwrap().inspect(), "15");
//! ```

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::eval::builtins;
use crate::eval::value::{Environment, Value};
use std::rc::Rc;

/// Stateless by design: every method takes the `Environment` it should
/// run against, rather than owning one, so the same `Evaluator` can
/// drive a REPL session across many `eval_program` calls that each
/// extend the same persistent environment.
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn eval_program(&self, program: &Program, env: &Environment) -> Option<Value> {
        let mut result = None;
        for stmt in &program.statements {
            match self.eval_statement(stmt, env) {
                Value::ReturnValue(inner) => return Some(*inner),
                error @ Value::Error(_) => return Some(error),
                value => result = Some(value),
            }
        }
        result
    }

    fn eval_block_statement(&self, block: &BlockStatement, env: &Environment) -> Value {
        let mut result = Value::Null;
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env);
            // Unlike `eval_program`, `ReturnValue` stays wrapped here so it
            // keeps propagating through any enclosing block or call.
            if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
                return result;
            }
        }
        result
    }

    fn eval_statement(&self, stmt: &Statement, env: &Environment) -> Value {
        match stmt {
            Statement::Let(s) => {
                let value = self.eval_expression(&s.value, env);
                if value.is_error() {
                    return value;
                }
                env.set(s.name.name.clone(), value);
                Value::Null
            }
            Statement::Return(s) => {
                let value = self.eval_expression(&s.value, env);
                if value.is_error() {
                    return value;
                }
                Value::ReturnValue(Box::new(value))
            }
            Statement::Expression(s) => self.eval_expression(&s.expression, env),
            Statement::Block(b) => self.eval_block_statement(b, env),
        }
    }

    fn eval_expression(&self, expr: &Expression, env: &Environment) -> Value {
        match expr {
            Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
            Expression::BooleanLiteral { value, .. } => Value::Boolean(*value),
            Expression::StringLiteral { value, .. } => Value::String(value.clone()),
            Expression::Identifier(id) => self.eval_identifier(&id.name, env),
            Expression::Prefix { operator, right, .. } => {
                let right = self.eval_expression(right, env);
                if right.is_error() {
                    return right;
                }
                eval_prefix_expression(operator, right)
            }
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.eval_expression(left, env);
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(right, env);
                if right.is_error() {
                    return right;
                }
                eval_infix_expression(operator, &left, &right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.eval_if_expression(condition, consequence, alternative.as_ref(), env),
            Expression::FunctionLiteral {
                parameters, body, ..
            } => Value::Function {
                parameters: parameters.clone(),
                body: Rc::new(body.clone()),
                env: env.clone(),
            },
            Expression::Call {
                function,
                arguments,
                ..
            } => self.eval_call_expression(function, arguments, env),
            Expression::ArrayLiteral { elements, .. } => {
                match self.eval_expressions(elements, env) {
                    Ok(values) => Value::Array(values),
                    Err(error) => error,
                }
            }
            Expression::Index { left, index, .. } => self.eval_index_expression(left, index, env),
        }
    }

    fn eval_identifier(&self, name: &str, env: &Environment) -> Value {
        if let Some(value) = env.get(name) {
            return value;
        }
        if let Some(builtin) = builtins::lookup(name) {
            return builtin;
        }
        Value::Error(format!("identifier not found: {name}"))
    }

    /// Evaluates left-to-right, short-circuiting on the first error.
    /// Shared by call arguments and array literals.
    fn eval_expressions(
        &self,
        exprs: &[Expression],
        env: &Environment,
    ) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let value = self.eval_expression(expr, env);
            if value.is_error() {
                return Err(value);
            }
            values.push(value);
        }
        Ok(values)
    }

    fn eval_if_expression(
        &self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
        env: &Environment,
    ) -> Value {
        let condition = self.eval_expression(condition, env);
        if condition.is_error() {
            return condition;
        }

        if condition.is_truthy() {
            self.eval_block_statement(consequence, env)
        } else if let Some(alternative) = alternative {
            self.eval_block_statement(alternative, env)
        } else {
            Value::Null
        }
    }

    fn eval_call_expression(
        &self,
        function: &Expression,
        arguments: &[Expression],
        env: &Environment,
    ) -> Value {
        let function = self.eval_expression(function, env);
        if function.is_error() {
            return function;
        }

        let args = match self.eval_expressions(arguments, env) {
            Ok(args) => args,
            Err(error) => return error,
        };

        self.apply_function(function, args)
    }

    fn apply_function(&self, function: Value, args: Vec<Value>) -> Value {
        match function {
            Value::Function {
                parameters,
                body,
                env: captured,
            } => {
                if parameters.len() != args.len() {
                    return Value::Error(format!(
                        "wrong number of arguments: expected {}, got {}",
                        parameters.len(),
                        args.len()
                    ));
                }

                let call_env = Environment::enclosed(&captured);
                for (param, arg) in parameters.iter().zip(args) {
                    call_env.set(param.name.clone(), arg);
                }

                match self.eval_block_statement(&body, &call_env) {
                    Value::ReturnValue(inner) => *inner,
                    other => other,
                }
            }
            Value::Builtin(name) => builtins::call(&name, &args),
            other => Value::Error(format!("not a function: {}", other.type_name())),
        }
    }

    fn eval_index_expression(
        &self,
        left: &Expression,
        index: &Expression,
        env: &Environment,
    ) -> Value {
        let left = self.eval_expression(left, env);
        if left.is_error() {
            return left;
        }
        let index = self.eval_expression(index, env);
        if index.is_error() {
            return index;
        }

        match (&left, &index) {
            (Value::Array(elements), Value::Integer(i)) => {
                if *i >= 0 && (*i as usize) < elements.len() {
                    elements[*i as usize].clone()
                } else {
                    Value::Null
                }
            }
            _ => Value::Error(format!(
                "index operator not supported: {}",
                left.type_name()
            )),
        }
    }
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang_operator(right),
        "-" => eval_minus_prefix_operator(right),
        other => Value::Error(format!("unknown operator: {other}{}", right.type_name())),
    }
}

fn eval_bang_operator(right: Value) -> Value {
    match right {
        Value::Boolean(true) => Value::Boolean(false),
        Value::Boolean(false) => Value::Boolean(true),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus_prefix_operator(right: Value) -> Value {
    match right {
        Value::Integer(n) => Value::Integer(-n),
        other => Value::Error(format!("unknown operator: -{}", other.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix_expression(operator, l, r),
        _ if left.type_name() != right.type_name() => Value::Error(format!(
            "type mismatch: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
        _ => eval_equality_infix_expression(operator, left, right),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::Error(format!("unknown operator: INTEGER {other} INTEGER")),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{left}{right}")),
        other => Value::Error(format!("unknown operator: STRING {other} STRING")),
    }
}

/// Reached for two values of the same type that are neither `Integer`
/// nor `String` (i.e. `Boolean`, `Null`, `Function`, `Array`, `Builtin`
/// compared against their own type). Identity comparison only applies to
/// `Boolean`/`Null`, whose singletons make `==`/`!=` meaningful; every
/// other same-typed pair is `unknown operator`, `==`/`!=` included.
fn eval_equality_infix_expression(operator: &str, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Boolean(_), Value::Boolean(_)) | (Value::Null, Value::Null) => match operator {
            "==" => Value::Boolean(left == right),
            "!=" => Value::Boolean(left != right),
            other => Value::Error(format!(
                "unknown operator: {} {other} {}",
                left.type_name(),
                right.type_name()
            )),
        },
        _ => Value::Error(format!(
            "unknown operator: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval(input: &str) -> Value {
        let program = Parser::new(input).parse_program();
        let env = Environment::new();
        Evaluator::new()
            .eval_program(&program, &env)
            .expect("non-empty program")
    }

    #[test]
    fn integer_arithmetic() {
        let cases = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Integer(expected), "input: {input}");
        }
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Boolean(expected), "input: {input}");
        }
    }

    #[test]
    fn bang_operator() {
        let cases = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Boolean(expected), "input: {input}");
        }
    }

    #[test]
    fn if_else_expressions() {
        assert_eq!(eval("if (true) { 10 }"), Value::Integer(10));
        assert_eq!(eval("if (false) { 10 }"), Value::Null);
        assert_eq!(eval("if (1) { 10 }"), Value::Integer(10));
        assert_eq!(eval("if (1 < 2) { 10 }"), Value::Integer(10));
        assert_eq!(eval("if (1 > 2) { 10 }"), Value::Null);
        assert_eq!(eval("if (1 > 2) { 10 } else { 20 }"), Value::Integer(20));
        assert_eq!(eval("if (1 < 2) { 10 } else { 20 }"), Value::Integer(10));
    }

    #[test]
    fn return_escapes_nested_blocks_but_not_the_function_boundary() {
        let cases = [
            ("return 10;", 10),
            ("return 10; 9;", 10),
            ("return 2 * 5; 9;", 10),
            ("9; return 2 * 5; 9;", 10),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                10,
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Integer(expected), "input: {input}");
        }
    }

    #[test]
    fn error_handling() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            ("5 / 0", "division by zero"),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Error(expected.to_string()), "input: {input}");
        }
    }

    #[test]
    fn let_statements() {
        let cases = [
            ("let a = 5; a;", 5),
            ("let a = 5 * 5; a;", 25),
            ("let a = 5; let b = a; b;", 5),
            ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Value::Integer(expected), "input: {input}");
        }
    }

    #[test]
    fn function_application_and_closures() {
        assert_eq!(eval("let identity = fn(x) { x; }; identity(5);"), Value::Integer(5));
        assert_eq!(
            eval("let identity = fn(x) { return x; }; identity(5);"),
            Value::Integer(5)
        );
        assert_eq!(eval("let double = fn(x) { x * 2; }; double(5);"), Value::Integer(10));
        assert_eq!(eval("let add = fn(x, y) { x + y; }; add(5, 5);"), Value::Integer(10));
        assert_eq!(
            eval("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));"),
            Value::Integer(20)
        );
        assert_eq!(eval("fn(x) { x; }(5)"), Value::Integer(5));
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let input = r#"
            let newAdder = fn(x) {
                fn(y) { x + y };
            };
            let addTwo = newAdder(2);
            addTwo(3);
        "#;
        assert_eq!(eval(input), Value::Integer(5));
    }

    #[test]
    fn a_named_function_can_call_itself_recursively() {
        let input = r#"
            let counter = fn(x) {
                if (x > 0) {
                    return counter(x - 1);
                }
                return 0;
            };
            counter(5);
        "#;
        assert_eq!(eval(input), Value::Integer(0));
    }

    #[test]
    fn arity_mismatch_is_a_runtime_error() {
        assert_eq!(
            eval("let add = fn(x, y) { x + y; }; add(1);"),
            Value::Error("wrong number of arguments: expected 2, got 1".to_string())
        );
    }

    #[test]
    fn string_literals_and_concatenation() {
        assert_eq!(eval(r#""Hello World!""#), Value::String("Hello World!".to_string()));
        assert_eq!(
            eval(r#""Hello" + " " + "World!""#),
            Value::String("Hello World!".to_string())
        );
    }

    #[test]
    fn len_builtin() {
        assert_eq!(eval(r#"len("")"#), Value::Integer(0));
        assert_eq!(eval(r#"len("four")"#), Value::Integer(4));
        assert_eq!(eval(r#"len("hello world")"#), Value::Integer(11));
        assert_eq!(
            eval("len(1)"),
            Value::Error("argument to 'len' not supported, got INTEGER".to_string())
        );
        assert_eq!(
            eval(r#"len("one", "two")"#),
            Value::Error("wrong number of arguments. got = 2, want = 1".to_string())
        );
    }

    #[test]
    fn array_literals_and_indexing() {
        assert_eq!(
            eval("[1, 2 * 2, 3 + 3]"),
            Value::Array(vec![Value::Integer(1), Value::Integer(4), Value::Integer(6)])
        );
        assert_eq!(eval("[1, 2, 3][0]"), Value::Integer(1));
        assert_eq!(eval("[1, 2, 3][1]"), Value::Integer(2));
        assert_eq!(eval("[1, 2, 3][2]"), Value::Integer(3));
        assert_eq!(eval("let i = 0; [1][i];"), Value::Integer(1));
        assert_eq!(eval("[1, 2, 3][1 + 1];"), Value::Integer(3));
        assert_eq!(eval("[1, 2, 3][3]"), Value::Null);
        assert_eq!(eval("[1, 2, 3][-1]"), Value::Null);
    }

    #[test]
    fn equality_is_unsupported_for_arrays_and_functions() {
        use pretty_assertions::assert_eq as pretty_eq;

        pretty_eq!(
            eval("[1, 2] == [1, 2]"),
            Value::Error("unknown operator: ARRAY == ARRAY".to_string())
        );
        pretty_eq!(
            eval("[1, 2] != [1, 2]"),
            Value::Error("unknown operator: ARRAY != ARRAY".to_string())
        );
        pretty_eq!(
            eval("let id = fn(x) { x }; id == id;"),
            Value::Error("unknown operator: FUNCTION == FUNCTION".to_string())
        );
    }

    #[test]
    fn empty_program_evaluates_to_absent() {
        let program = Parser::new("").parse_program();
        let env = Environment::new();
        assert!(Evaluator::new().eval_program(&program, &env).is_none());
    }
}

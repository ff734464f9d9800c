//! End-to-end source-to-value scenarios.

use monkey::eval::Environment;
use monkey::eval_source;

fn eval(input: &str) -> String {
    let env = Environment::new();
    match eval_source(input, &env) {
        Ok(Some(value)) => value.inspect(),
        Ok(None) => String::new(),
        Err(err) => err.to_string(),
    }
}

#[test]
fn integer_arithmetic_through_bindings() {
    assert_eq!(eval("let a = 5; let b = a; let c = a + b + 5; c;"), "15");
}

#[test]
fn function_application() {
    assert_eq!(eval("let add = fn(x, y) { x + y; }; add(5, 5);"), "10");
}

#[test]
fn higher_order_functions_and_currying() {
    let input = "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);";
    assert_eq!(eval(input), "5");
}

#[test]
fn runtime_type_error_inside_nested_blocks() {
    let input = "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }";
    assert_eq!(eval(input), "ERROR: unknown operator: BOOLEAN + BOOLEAN");
}

#[test]
fn string_concatenation() {
    assert_eq!(eval(r#""Hello" + " " + "World!""#), "Hello World!");
}

#[test]
fn len_builtin_on_a_string() {
    assert_eq!(eval(r#"len("four")"#), "4");
}

#[test]
fn array_literal_and_indexing() {
    assert_eq!(eval("[1, 2 * 2, 3 + 3][1]"), "4");
}

#[test]
fn unbound_identifier_is_a_runtime_error() {
    assert_eq!(eval("foobar"), "ERROR: identifier not found: foobar");
}

#[test]
fn empty_program_produces_no_output() {
    assert_eq!(eval(""), "");
}

#[test]
fn trailing_semicolons_are_optional() {
    assert_eq!(eval("let x = 5; x"), "5");
}

#[test]
fn a_parser_error_prevents_evaluation() {
    let env = Environment::new();
    let result = eval_source("let x 5;", &env);
    assert!(result.is_err());
}

#[test]
fn a_session_can_span_multiple_eval_source_calls() {
    // Models the REPL: a persistent Environment carries bindings across
    // separately-lexed/parsed lines.
    let env = Environment::new();
    eval_source("let fact = fn(n) { if (n < 2) { 1 } else { n * fact(n - 1) } };", &env)
        .unwrap();
    let result = eval_source("fact(5);", &env).unwrap().unwrap();
    assert_eq!(result.inspect(), "120");
}

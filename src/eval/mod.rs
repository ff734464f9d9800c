//! Tree-walking evaluation of Monkey programs.
//!
//! # Example
//!
//! ```rust
//! use monkey::eval::{Environment, Evaluator};
//! use monkey::parser::Parser;
//!
//! let program = Parser::new("let x = 5; x + 1;").parse_program();
//! let env = Environment::new();
//! let result = Evaluator::new().eval_program(&program, &env);
//! assert_eq!(result.unwrap().inspect(), "6");
//! ```

pub mod builtins;
pub mod interpreter;
pub mod value;

pub use interpreter::Evaluator;
pub use value::{Environment, Value};

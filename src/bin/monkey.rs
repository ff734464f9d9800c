//! `monkey` - run a Monkey script, or start an interactive REPL.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a script file
//! monkey script.monkey
//!
//! # Start the REPL
//! monkey
//! ```

use anyhow::Result;
use clap::Parser as ClapParser;
use colored::Colorize;
use monkey::error::MonkeyError;
use monkey::eval::Environment;
use monkey::eval_source;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for the Monkey scripting language
#[derive(ClapParser, Debug)]
#[command(name = "monkey")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to run; starts the REPL if omitted
    script: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    match args.script {
        Some(path) => run_file(&path),
        None => {
            run_repl()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_file(path: &PathBuf) -> Result<ExitCode> {
    let source = std::fs::read_to_string(path).map_err(|source| MonkeyError::Io {
        path: path.clone(),
        source,
    })?;

    let env = Environment::new();
    match eval_source(&source, &env) {
        Ok(Some(value)) => {
            println!("{}", value.inspect());
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(MonkeyError::Parse(messages)) => {
            for message in messages {
                eprintln!("{}", message.red());
            }
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}

const PROMPT: &str = ">> ";

fn run_repl() -> Result<()> {
    println!("Hello! This is the Monkey programming language.");
    println!("Feel free to type in commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let env = Environment::new();

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }

        match eval_source(&line, &env) {
            Ok(Some(value)) => println!("{}", value.inspect()),
            Ok(None) => {}
            Err(MonkeyError::Parse(messages)) => {
                println!("{}", "parser errors:".red());
                for message in messages {
                    println!("\t{}", message.red());
                }
            }
            Err(other) => println!("{}", other.to_string().red()),
        }
    }
}

//! Interpreter for the Monkey scripting language.
//!
//! Source text goes through [`lexer`] → [`parser`] → [`ast`] and is run by the
//! tree‑walking [`evaluator`] against an [`environment`], producing an
//! [`object::Object`].

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::ast::Program;
use crate::environment::Env;
use crate::error::Result;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

/// Parse `source` into a program plus the messages collected on the way.
/// An empty message list means the program is safe to evaluate.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    (program, parser.into_errors())
}

/// Evaluate `program` in `env`.  Top‑level bindings are left in `env`.
pub fn evaluate(program: &Program, env: &Env) -> Object {
    evaluator::eval_program(program, env)
}

/// Read a Monkey source file.  Fails with [`error::MonkeyError::Io`] when the
/// file cannot be read and [`error::MonkeyError::Utf8`] when it is not UTF‑8.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    info!("Reading file: {:?}", path);

    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

    info!("Read {} bytes from {:?}", bytes.len(), path);

    Ok(String::from_utf8(bytes)?)
}

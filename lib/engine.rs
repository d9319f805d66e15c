use std::io::{BufRead, Write};

use crate::{ast::Program, error::Error, evaluator::Evaluator, lexer::Lexer, parser::Parser};

/// Lexes and parses `source` without running it.
pub fn parse(source: &str) -> Result<Program, Error> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer)?;
    parser.parse_program()
}

/// Parses `source` and runs it with a fresh global scope. Nothing is run if
/// the source fails to parse.
pub fn run<R: BufRead, W: Write>(source: &str, input: R, output: W) -> Result<(), Error> {
    let program = parse(source)?;
    let mut evaluator = Evaluator::new(input, output);
    evaluator.eval(&program)?;
    Ok(())
}

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

mod engine;

pub use engine::{parse, run};
pub use environment::Environment;
pub use error::{Error, LexError, ParseError, RuntimeError};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use parser::Parser;
pub use value::Value;

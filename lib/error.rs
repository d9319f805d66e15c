use std::io;

use thiserror::Error;

use crate::token::{Keyword, Position, TokenKind};

#[derive(Debug, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },
    #[error("invalid character {character:?} at {position}")]
    InvalidCharacter { character: char, position: Position },
    #[error("malformed number {literal:?} at {position}")]
    MalformedNumber { literal: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::InvalidCharacter { position, .. }
            | LexError::MalformedNumber { position, .. } => *position,
        }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        position: Position,
    },
    #[error("expected '{expected}' to close block, found {found} at {position}")]
    ExpectedClosingKeyword {
        expected: Keyword,
        found: TokenKind,
        position: Position,
    },
    #[error("unmatched '(' opened at {opened}, found {found} at {position}")]
    UnmatchedParenthesis {
        opened: Position,
        found: TokenKind,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::ExpectedClosingKeyword { position, .. }
            | ParseError::UnmatchedParenthesis { position, .. } => *position,
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("undefined variable '{name}' at {position}")]
    UndefinedVariable { name: String, position: Position },
    #[error("undefined function '{name}' at {position}")]
    UndefinedFunction { name: String, position: Position },
    #[error("type mismatch: {detail} at {position}")]
    TypeMismatch { detail: String, position: Position },
    #[error("division by zero at {position}")]
    DivisionByZero { position: Position },
    #[error("number out of range: {detail} at {position}")]
    NumberOutOfRange { detail: String, position: Position },
    #[error("for loop step must move the counter at {position}")]
    InvalidStep { position: Position },
    #[error("wrong number of arguments for '{name}': want={expected}, got={found} at {position}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        position: Position,
    },
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

impl RuntimeError {
    pub fn position(&self) -> Option<Position> {
        match self {
            RuntimeError::UndefinedVariable { position, .. }
            | RuntimeError::UndefinedFunction { position, .. }
            | RuntimeError::TypeMismatch { position, .. }
            | RuntimeError::DivisionByZero { position }
            | RuntimeError::NumberOutOfRange { position, .. }
            | RuntimeError::InvalidStep { position }
            | RuntimeError::ArityMismatch { position, .. } => Some(*position),
            RuntimeError::Io(_) => None,
        }
    }
}

/// Any failure of the lex, parse, evaluate pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(err) => Some(err.position()),
            Error::Parse(err) => Some(err.position()),
            Error::Runtime(err) => err.position(),
        }
    }
}

use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Num,
    String,
    Set,
    And,
    Or,
    Not,
    If,
    Then,
    ElseIf,
    Else,
    EndIf,
    For,
    To,
    Step,
    Do,
    EndFor,
    While,
    EndWhile,
    Func,
    EndFunc,
    Output,
    Input,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        let mut keywords = HashMap::new();
        for keyword in Keyword::ALL {
            keywords.insert(keyword.as_str(), keyword);
        }
        keywords
    };
}

impl Keyword {
    const ALL: [Keyword; 22] = [
        Keyword::Num,
        Keyword::String,
        Keyword::Set,
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
        Keyword::If,
        Keyword::Then,
        Keyword::ElseIf,
        Keyword::Else,
        Keyword::EndIf,
        Keyword::For,
        Keyword::To,
        Keyword::Step,
        Keyword::Do,
        Keyword::EndFor,
        Keyword::While,
        Keyword::EndWhile,
        Keyword::Func,
        Keyword::EndFunc,
        Keyword::Output,
        Keyword::Input,
    ];

    /// Looks up the reserved word spelled exactly as `ident`.
    pub fn lookup(ident: &str) -> Option<Keyword> {
        KEYWORDS.get(ident).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Num => "Num",
            Keyword::String => "String",
            Keyword::Set => "set",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::ElseIf => "elseif",
            Keyword::Else => "else",
            Keyword::EndIf => "endif",
            Keyword::For => "for",
            Keyword::To => "to",
            Keyword::Step => "step",
            Keyword::Do => "do",
            Keyword::EndFor => "endfor",
            Keyword::While => "while",
            Keyword::EndWhile => "endwhile",
            Keyword::Func => "func",
            Keyword::EndFunc => "endfunc",
            Keyword::Output => "output",
            Keyword::Input => "input",
        }
    }

    /// Keywords that can only close (or split) a block body.
    pub fn is_block_terminator(&self) -> bool {
        matches!(
            self,
            Keyword::ElseIf
                | Keyword::Else
                | Keyword::EndIf
                | Keyword::EndFor
                | Keyword::EndWhile
                | Keyword::EndFunc
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Keyword(Keyword),
    Ident(String),

    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Caret,
    Assign,

    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Comma,
    Lparen,
    Rparen,

    Eof,
}

impl TokenKind {
    pub fn variant_eq(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(found) if *found == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number(value) => write!(f, "{}", value),
            TokenKind::String(value) => write!(f, "{:?}", value),
            TokenKind::Keyword(keyword) => write!(f, "'{}'", keyword),
            TokenKind::Ident(ident) => write!(f, "{}", ident),

            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Asterisk => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Assign => write!(f, "'='"),

            TokenKind::Eq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::GtEq => write!(f, "'>='"),

            TokenKind::Comma => write!(f, "','"),
            TokenKind::Lparen => write!(f, "'('"),
            TokenKind::Rparen => write!(f, "')'"),

            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

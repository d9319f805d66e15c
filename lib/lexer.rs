use crate::{
    error::LexError,
    token::{Keyword, Position, Token, TokenKind},
};

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    char: Option<char>,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let char = chars.first().copied();
        Self {
            chars,
            position: 0,
            char,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Returns the next token. Once the input is exhausted every further
    /// call returns `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        while self.char.is_some_and(|char| char.is_whitespace()) {
            self.read_char();
        }

        let position = self.location();

        let Some(char) = self.char else {
            return Ok(Token::new(TokenKind::Eof, position));
        };

        let kind = match char {
            '"' => return self.read_string(position),
            _ if char.is_ascii_digit() => return self.read_number(position),
            _ if char.is_alphabetic() || char == '_' => {
                let literal = self.read_while(|char| char.is_alphanumeric() || char == '_');
                let kind = match Keyword::lookup(&literal) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Ident(literal),
                };
                return Ok(Token::new(kind, position));
            }
            '=' if self.is_next_char('=') => {
                self.read_char();
                TokenKind::Eq
            }
            '=' => TokenKind::Assign,
            '!' if self.is_next_char('=') => {
                self.read_char();
                TokenKind::NotEq
            }
            '<' if self.is_next_char('=') => {
                self.read_char();
                TokenKind::LtEq
            }
            '<' => TokenKind::Lt,
            '>' if self.is_next_char('=') => {
                self.read_char();
                TokenKind::GtEq
            }
            '>' => TokenKind::Gt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            '(' => TokenKind::Lparen,
            ')' => TokenKind::Rparen,
            character => {
                self.finished = true;
                return Err(LexError::InvalidCharacter {
                    character,
                    position,
                });
            }
        };

        self.read_char();

        Ok(Token::new(kind, position))
    }

    fn location(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn read_char(&mut self) {
        if self.char == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else if self.char.is_some() {
            self.column += 1;
        }
        self.position += 1;
        self.char = self.chars.get(self.position).copied();
    }

    fn is_next_char(&self, ch: char) -> bool {
        self.chars.get(self.position + 1).eq(&Some(&ch))
    }

    fn read_while(&mut self, condition: impl Fn(char) -> bool) -> String {
        let mut literal = String::new();
        while let Some(char) = self.char.filter(|char| condition(*char)) {
            literal.push(char);
            self.read_char();
        }
        literal
    }

    fn read_number(&mut self, position: Position) -> Result<Token, LexError> {
        let mut literal = self.read_while(|char| char.is_ascii_digit());

        if self.char == Some('.') {
            literal.push('.');
            self.read_char();
            let fraction = self.read_while(|char| char.is_ascii_digit());
            if fraction.is_empty() {
                return Err(self.malformed_number(literal, position));
            }
            literal.push_str(&fraction);
        }

        if let Some(char) = self
            .char
            .filter(|char| *char == '.' || char.is_alphabetic() || *char == '_')
        {
            literal.push(char);
            return Err(self.malformed_number(literal, position));
        }

        match literal.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::new(TokenKind::Number(value), position)),
            _ => Err(self.malformed_number(literal, position)),
        }
    }

    fn malformed_number(&mut self, literal: String, position: Position) -> LexError {
        self.finished = true;
        LexError::MalformedNumber { literal, position }
    }

    fn read_string(&mut self, position: Position) -> Result<Token, LexError> {
        // opening quote
        self.read_char();

        let mut literal = String::new();
        loop {
            match self.char {
                None => {
                    self.finished = true;
                    return Err(LexError::UnterminatedString { position });
                }
                Some('"') => {
                    self.read_char();
                    return Ok(Token::new(TokenKind::String(literal), position));
                }
                Some('\\') => {
                    self.read_char();
                    let escaped = match self.char {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(character) => {
                            self.finished = true;
                            return Err(LexError::InvalidCharacter {
                                character,
                                position: self.location(),
                            });
                        }
                        None => {
                            self.finished = true;
                            return Err(LexError::UnterminatedString { position });
                        }
                    };
                    literal.push(escaped);
                    self.read_char();
                }
                Some(char) => {
                    literal.push(char);
                    self.read_char();
                }
            }
        }
    }
}

/// Yields every token up to and including `Eof`, then stops. Stops for good
/// after the first error.
impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        match &token {
            Ok(Token {
                kind: TokenKind::Eof,
                ..
            })
            | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(token)
    }
}

/// Reads text typed at an `input` prompt as a number when it is spelled like
/// a numeric literal, optionally negated.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let is_digits = |part: &str| !part.is_empty() && part.chars().all(|char| char.is_ascii_digit());
    if !is_digits(whole) || fraction.is_some_and(|fraction| !is_digits(fraction)) {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Not,
    Or,
    And,
    True,
    False,
    LParen,
    RParen,
    Variable,
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Not => "NOT",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::True => "1",
            TokenKind::False => "0",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Variable => "variable",
            TokenKind::Eof => "end of input",
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Byte offset into the input.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("variable names cannot start with {found:?} (at {position})")]
    InvalidIdentifierStart { found: char, position: usize },
    #[error("unexpected token `{found}` (at {position})")]
    UnexpectedToken { found: TokenKind, position: usize },
    #[error("expected `{expected}`, got `{found}` (at {position})")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },
    #[error("formula nested deeper than {limit} levels (at {position})")]
    TooDeep { limit: usize, position: usize },
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `text` into tokens. The result always ends with a single `Eof` token.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        let token = match c {
            ' ' | '\t' | '\r' | '\n' => continue,
            '(' => Token::new(TokenKind::LParen, "(", position),
            ')' => Token::new(TokenKind::RParen, ")", position),
            '1' => Token::new(TokenKind::True, "1", position),
            '0' => Token::new(TokenKind::False, "0", position),
            c if is_identifier_start(c) => {
                let mut end = position + c.len_utf8();
                while let Some(&(i, c)) = chars.peek() {
                    if !is_identifier_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let word = &text[position..end];
                let kind = match word {
                    "NOT" => TokenKind::Not,
                    "OR" => TokenKind::Or,
                    "AND" => TokenKind::And,
                    _ => TokenKind::Variable,
                };
                Token::new(kind, word, position)
            }
            found => return Err(ParseError::InvalidIdentifierStart { found, position }),
        };
        tokens.push(token);
    }

    tokens.push(Token::new(TokenKind::Eof, "", text.len()));
    log::debug!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

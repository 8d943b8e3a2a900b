use crate::ast::Token;

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected '!' at offset {offset} (did you mean '!=' or 'not'?)")]
    BareBang { offset: usize },

    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Invalid escape sequence '\\{ch}' at offset {offset}")]
    InvalidEscape { ch: char, offset: usize },

    #[error("Invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedChar { offset, .. }
            | LexError::BareBang { offset }
            | LexError::UnterminatedString { offset }
            | LexError::InvalidEscape { offset, .. }
            | LexError::InvalidNumber { offset, .. } => *offset,
        }
    }
}

/// Character position in the source text (0-based, counted in chars).
pub type Position = usize;

pub struct Lexer {
    input: Vec<char>,
    position: Position,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Offset where the most recently returned token starts.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                offset: self.position - 1,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { offset: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { offset: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = |number: String| LexError::InvalidNumber {
            text: number,
            offset: start,
        };

        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| invalid(number.clone()))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| invalid(number.clone()))
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, LexError> {
        self.advance();
        Ok(token)
    }

    fn pair_or_single(&mut self, second: char, pair: Token, single: Token) -> Result<Token, LexError> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(pair)
        } else {
            self.single(single)
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('.') => self.single(Token::Dot),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some('-') => self.single(Token::Minus),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('=') => self.pair_or_single('=', Token::EqEq, Token::Assign),
            Some('<') => self.pair_or_single('=', Token::LtEq, Token::Lt),
            Some('>') => self.pair_or_single('=', Token::GtEq, Token::Gt),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(LexError::BareBang {
                        offset: self.position,
                    })
                }
            }
            Some('"') => self.read_string('"').map(Token::String),
            Some('\'') => self.read_string('\'').map(Token::String),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                Ok(match ident.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" | "True" => Token::Boolean(true),
                    "false" | "False" => Token::Boolean(false),
                    "null" | "None" => Token::Null,
                    _ => Token::Identifier(ident),
                })
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => Err(LexError::UnexpectedChar {
                ch,
                offset: self.position,
            }),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not True false None");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
}

#[test]
fn test_comparison_offsets() {
    let mut lexer = Lexer::new("os.type == 'Linux'");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("os".to_string()));
    assert_eq!(lexer.token_start(), 0);
    assert_eq!(lexer.next_token().unwrap(), Token::Dot);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("type".to_string()));
    assert_eq!(lexer.token_start(), 3);
    assert_eq!(lexer.next_token().unwrap(), Token::EqEq);
    assert_eq!(lexer.token_start(), 8);
    assert_eq!(lexer.next_token().unwrap(), Token::String("Linux".to_string()));
    assert_eq!(lexer.token_start(), 11);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

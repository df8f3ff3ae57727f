use crate::error::ScanError;
use crate::session::Session;
use crate::token::{Token, TokenType};
use log::trace;
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

// Note: current becomes self.iter.peek()?.0
struct Scanner<'a> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
    start: usize,
    line: i32,
}

/// Scans the whole source in one pass. Lexical errors are reported through
/// the session and do not stop the scan, so one pass can surface several of
/// them. The returned stream always ends with an EOF token.
pub fn scan_tokens(source: &str, session: &mut Session) -> Vec<Token> {
    let mut scanner = Scanner {
        source,
        iter: source.char_indices().peekable(),
        start: 0,
        line: 1,
    };
    let mut tokens: Vec<Token> = Vec::new();

    while let Some((idx, _)) = scanner.iter.peek() {
        scanner.start = *idx;
        match scanner.scan_token() {
            Ok(Some(token)) => {
                trace!("scanned {}", token);
                tokens.push(token);
            }
            Ok(None) => (),
            Err(error) => session.error(error.line, &error.message),
        }
    }
    tokens.push(Token {
        tokentype: TokenType::EOF,
        lexeme: String::new(),
        line: scanner.line,
    });
    tokens
}

impl<'a> Scanner<'a> {
    fn scan_token(&mut self) -> Result<Option<Token>, ScanError> {
        match self.advance()?.1 {
            '(' => Ok(Some(self.token(TokenType::LeftParen))),
            ')' => Ok(Some(self.token(TokenType::RightParen))),
            '{' => Ok(Some(self.token(TokenType::LeftBrace))),
            '}' => Ok(Some(self.token(TokenType::RightBrace))),
            ',' => Ok(Some(self.token(TokenType::Comma))),
            '.' => Ok(Some(self.token(TokenType::Dot))),
            '-' => Ok(Some(self.token(TokenType::Minus))),
            '+' => Ok(Some(self.token(TokenType::Plus))),
            ';' => Ok(Some(self.token(TokenType::Semicolon))),
            '*' => Ok(Some(self.token(TokenType::Star))),
            '?' => Ok(Some(self.token(TokenType::QuestionMark))),
            ':' => Ok(Some(self.token(TokenType::Colon))),
            '!' => {
                if self.next_if('=') {
                    Ok(Some(self.token(TokenType::BangEqual)))
                } else {
                    Ok(Some(self.token(TokenType::Bang)))
                }
            }
            '=' => {
                if self.next_if('=') {
                    Ok(Some(self.token(TokenType::EqualEqual)))
                } else {
                    Ok(Some(self.token(TokenType::Equal)))
                }
            }
            '<' => {
                if self.next_if('=') {
                    Ok(Some(self.token(TokenType::LessEqual)))
                } else {
                    Ok(Some(self.token(TokenType::Less)))
                }
            }
            '>' => {
                if self.next_if('=') {
                    Ok(Some(self.token(TokenType::GreaterEqual)))
                } else {
                    Ok(Some(self.token(TokenType::Greater)))
                }
            }
            '/' => {
                if self.next_if('/') {
                    while let Some((_, c)) = self.iter.peek() {
                        if *c == '\n' {
                            break;
                        }
                        self.iter.next();
                    }
                    Ok(None)
                } else if self.next_if('*') {
                    self.block_comment();
                    Ok(None)
                } else {
                    Ok(Some(self.token(TokenType::Slash)))
                }
            }
            ' ' | '\r' | '\t' => Ok(None),
            '\n' => {
                self.line += 1;
                Ok(None)
            }
            '"' => Ok(Some(self.string()?)),
            '0'..='9' => Ok(Some(self.number()?)),
            'a'..='z' | 'A'..='Z' | '_' => Ok(Some(self.identifier())),
            _ => Err(ScanError {
                line: self.line,
                message: "Unexpected character.".to_string(),
            }),
        }
    }

    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }

    fn token(&mut self, tokentype: TokenType) -> Token {
        let current = self.current();
        Token {
            tokentype,
            lexeme: self.source[self.start..current].to_string(),
            line: self.line,
        }
    }

    fn next_if(&mut self, expected: char) -> bool {
        if let Some((_, c)) = self.iter.peek() {
            if *c == expected {
                self.iter.next();
                return true;
            }
        }
        false
    }

    fn advance(&mut self) -> Result<(usize, char), ScanError> {
        self.iter.next().ok_or(ScanError {
            line: self.line,
            message: "Unexpected end of input.".to_string(),
        })
    }

    // Runs to the closing "*/", counting embedded newlines. Reaching the end
    // of input first is not an error; the comment just ends with the file.
    fn block_comment(&mut self) {
        while let Some((_, c)) = self.iter.next() {
            match c {
                '\n' => self.line += 1,
                '*' => {
                    if self.next_if('/') {
                        return;
                    }
                }
                _ => (),
            }
        }
    }

    fn string(&mut self) -> Result<Token, ScanError> {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '"' => break,
                '\n' => {
                    self.line += 1;
                    self.iter.next();
                }
                _ => {
                    self.iter.next();
                }
            }
        }
        if self.iter.next().is_none() {
            return Err(ScanError {
                line: self.line,
                message: "Unterminated string.".to_string(),
            });
        }
        let current = self.current();
        Ok(self.token(TokenType::String(
            self.source[self.start + 1..current - 1].to_string(),
        )))
    }

    fn number(&mut self) -> Result<Token, ScanError> {
        self.digits();

        // A '.' only belongs to the number when digits follow it.
        if let Some((_, '.')) = self.iter.peek() {
            let mut lookahead = self.iter.clone();
            lookahead.next();
            if let Some((_, '0'..='9')) = lookahead.peek() {
                self.iter.next();
                self.digits();
            }
        }

        let current = self.current();
        let lexeme = &self.source[self.start..current];
        let value = lexeme.parse().map_err(|_| ScanError {
            line: self.line,
            message: format!("Invalid number '{}'.", lexeme),
        })?;
        Ok(self.token(TokenType::Number(value)))
    }

    fn digits(&mut self) {
        while let Some((_, '0'..='9')) = self.iter.peek() {
            self.iter.next();
        }
    }

    fn identifier(&mut self) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
        let current = self.current();
        match KEYWORDS.get(&self.source[self.start..current]) {
            None => self.token(TokenType::Identifier(
                self.source[self.start..current].to_string(),
            )),
            Some(keyword) => self.token(keyword.clone()),
        }
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and" => TokenType::And,
    "be" => TokenType::Be,
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "for" => TokenType::For,
    "forawhile" => TokenType::Forawhile,
    "forever" => TokenType::Forever,
    "func" => TokenType::Func,
    "if" => TokenType::If,
    "let" => TokenType::Let,
    "nil" => TokenType::Nil,
    "or" => TokenType::Or,
    "print" => TokenType::Print,
    "return" => TokenType::Return,
    "true" => TokenType::True,
    "while" => TokenType::While,
};

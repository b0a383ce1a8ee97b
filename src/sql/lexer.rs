//! SQL Lexer (Tokenizer)
//!
//! This module converts a statement string into a sequence of tokens in a
//! single left-to-right pass. Spaces, tabs and newlines are dropped;
//! anything that is not a keyword, number, quoted string, identifier or one
//! of `= * , ( )` aborts tokenization.

use super::token::{Keyword, Token};
use crate::error::{Error, Result};

/// SQL Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get the next token, or `None` at end of input
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(None);
        }

        let ch = self.current_char();

        if let Some(token) = Token::from_punctuation(ch) {
            self.advance();
            return Ok(Some(token));
        }

        if ch == '\'' {
            return self.read_string().map(Some);
        }

        if ch.is_ascii_digit() {
            return self.read_number().map(Some);
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(Some(self.read_word()));
        }

        Err(Error::UnexpectedCharacter(ch, self.position))
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skip spaces, tabs and newlines; other whitespace is not accepted
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && matches!(self.current_char(), ' ' | '\t' | '\n') {
            self.advance();
        }
    }

    /// Read a single-quoted string literal
    ///
    /// A backslash keeps the following character (including a quote) in
    /// the literal verbatim; no other escape processing happens. An
    /// unterminated literal is reported at its opening quote.
    fn read_string(&mut self) -> Result<Token> {
        let start_pos = self.position;
        self.advance(); // skip opening quote

        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            match ch {
                '\'' => {
                    self.advance(); // skip closing quote
                    return Ok(Token::String(value));
                }
                '\\' if self.position + 1 < self.input.len() => {
                    value.push(ch);
                    self.advance();
                    value.push(self.current_char());
                    self.advance();
                }
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Err(Error::UnexpectedCharacter('\'', start_pos))
    }

    /// Read an unsigned integer literal
    fn read_number(&mut self) -> Result<Token> {
        let start_pos = self.position;
        let mut value = String::new();

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            value.push(self.current_char());
            self.advance();
        }

        value
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|_| Error::InvalidNumber(value, start_pos))
    }

    /// Read an identifier or keyword
    fn read_word(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_ascii_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match Keyword::from_word(&value) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(value),
        }
    }
}

/// Tokenize a statement string
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

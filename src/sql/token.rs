//! SQL Token definitions
//!
//! This module defines all tokens that can appear in MiniDB statements.

use std::fmt;

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // DDL
    Create,
    Drop,
    Table,
    Index,

    // DML
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,

    // Joins (reserved; joins go through the engine API)
    Join,
    On,

    // Constraints
    Primary,
    Key,
    Unique,

    // Data types
    Int,
    Str,
}

impl Keyword {
    /// Try to parse a keyword, ignoring case
    pub fn from_word(s: &str) -> Option<Keyword> {
        match s.to_uppercase().as_str() {
            "CREATE" => Some(Keyword::Create),
            "DROP" => Some(Keyword::Drop),
            "TABLE" => Some(Keyword::Table),
            "INDEX" => Some(Keyword::Index),
            "INSERT" => Some(Keyword::Insert),
            "INTO" => Some(Keyword::Into),
            "VALUES" => Some(Keyword::Values),
            "SELECT" => Some(Keyword::Select),
            "FROM" => Some(Keyword::From),
            "WHERE" => Some(Keyword::Where),
            "UPDATE" => Some(Keyword::Update),
            "SET" => Some(Keyword::Set),
            "DELETE" => Some(Keyword::Delete),
            "JOIN" => Some(Keyword::Join),
            "ON" => Some(Keyword::On),
            "PRIMARY" => Some(Keyword::Primary),
            "KEY" => Some(Keyword::Key),
            "UNIQUE" => Some(Keyword::Unique),
            "INT" => Some(Keyword::Int),
            "STR" => Some(Keyword::Str),
            _ => None,
        }
    }

    /// Normalized (uppercase) spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Drop => "DROP",
            Keyword::Table => "TABLE",
            Keyword::Index => "INDEX",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
            Keyword::Join => "JOIN",
            Keyword::On => "ON",
            Keyword::Primary => "PRIMARY",
            Keyword::Key => "KEY",
            Keyword::Unique => "UNIQUE",
            Keyword::Int => "INT",
            Keyword::Str => "STR",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Number,
    String,
    Identifier,
    Punctuation,
}

/// SQL Token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Reserved word, matched case-insensitively
    Keyword(Keyword),
    /// Integer literal
    Number(i64),
    /// String literal, quotes stripped
    String(String),
    /// Identifier (table name, column name)
    Identifier(String),

    // ========== Punctuation ==========
    /// =
    Eq,
    /// *
    Asterisk,
    /// ,
    Comma,
    /// (
    LParen,
    /// )
    RParen,
}

impl Token {
    /// Get the category of this token
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(_) => TokenKind::Keyword,
            Token::Number(_) => TokenKind::Number,
            Token::String(_) => TokenKind::String,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Eq | Token::Asterisk | Token::Comma | Token::LParen | Token::RParen => {
                TokenKind::Punctuation
            }
        }
    }

    /// Map a punctuation character to its token
    pub fn from_punctuation(ch: char) -> Option<Token> {
        match ch {
            '=' => Some(Token::Eq),
            '*' => Some(Token::Asterisk),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        }
    }

    /// Check whether this token is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(k) => write!(f, "{}", k),
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Eq => write!(f, "="),
            Token::Asterisk => write!(f, "*"),
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

//! SQL Parser
//!
//! This module parses one statement's tokens into an AST. A statement must
//! consume every token; anything left over is a syntax error.

use super::ast::*;
use super::lexer::Lexer;
use super::token::{Keyword, Token};
use crate::catalog::DataType;
use crate::error::{Error, Result};

/// SQL Parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from a SQL string
    pub fn new(sql: &str) -> Result<Self> {
        let tokens = Lexer::new(sql).tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Create a parser over an existing token sequence
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse exactly one statement
    ///
    /// Returns `None` when there are no tokens at all.
    pub fn parse(mut self) -> Result<Option<Statement>> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let stmt = self.parse_statement()?;

        if let Some(token) = self.current() {
            return Err(Error::UnexpectedToken {
                expected: "end of statement".to_string(),
                found: token.to_string(),
            });
        }

        Ok(Some(stmt))
    }

    /// Dispatch on the leading token
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current() {
            Some(Token::Keyword(Keyword::Create)) => self.parse_create(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop(),
            Some(Token::Keyword(Keyword::Insert)) => self.parse_insert().map(Statement::Insert),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select().map(Statement::Select),
            Some(Token::Keyword(Keyword::Update)) => self.parse_update().map(Statement::Update),
            Some(Token::Keyword(Keyword::Delete)) => self.parse_delete().map(Statement::Delete),
            Some(token) => Err(Error::Syntax(format!("unknown command '{}'", token))),
            None => Err(Error::UnexpectedEnd("a statement".to_string())),
        }
    }

    // ========== CREATE Statement ==========

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Create)?;

        match self.current() {
            Some(Token::Keyword(Keyword::Table)) => {
                self.parse_create_table().map(Statement::CreateTable)
            }
            Some(Token::Keyword(Keyword::Index)) => {
                self.parse_create_index().map(Statement::CreateIndex)
            }
            _ => Err(self.unexpected("TABLE or INDEX")),
        }
    }

    fn parse_create_table(&mut self) -> Result<CreateTableStatement> {
        self.expect_keyword(Keyword::Table)?;

        let table_name = self.expect_identifier()?;

        self.expect(&Token::LParen)?;

        let mut columns = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let data_type = self.parse_data_type()?;
            columns.push(ColumnDef { name, data_type });

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RParen)?;

        let primary_key = if self.check_keyword(Keyword::Primary) {
            self.advance();
            self.expect_keyword(Keyword::Key)?;
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let mut unique_keys = Vec::new();
        if self.check_keyword(Keyword::Unique) {
            self.advance();
            unique_keys = self.parse_identifier_list()?;
        }

        Ok(CreateTableStatement {
            table_name,
            columns,
            primary_key,
            unique_keys,
        })
    }

    fn parse_data_type(&mut self) -> Result<DataType> {
        let data_type = match self.current() {
            Some(Token::Keyword(Keyword::Int)) => DataType::Integer,
            Some(Token::Keyword(Keyword::Str)) => DataType::Text,
            _ => return Err(self.unexpected("INT or STR")),
        };
        self.advance();
        Ok(data_type)
    }

    fn parse_create_index(&mut self) -> Result<CreateIndexStatement> {
        self.expect_keyword(Keyword::Index)?;
        self.expect_keyword(Keyword::On)?;

        let table_name = self.expect_identifier()?;

        self.expect(&Token::LParen)?;
        let column = self.expect_identifier()?;
        self.expect(&Token::RParen)?;

        Ok(CreateIndexStatement { table_name, column })
    }

    // ========== DROP Statement ==========

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let table_name = self.expect_identifier()?;
        Ok(Statement::DropTable(table_name))
    }

    // ========== INSERT Statement ==========

    fn parse_insert(&mut self) -> Result<InsertStatement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let table_name = self.expect_identifier()?;

        self.expect_keyword(Keyword::Values)?;
        self.expect(&Token::LParen)?;

        let mut values = Vec::new();
        loop {
            values.push(self.parse_literal()?);

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RParen)?;

        Ok(InsertStatement { table_name, values })
    }

    // ========== SELECT Statement ==========

    fn parse_select(&mut self) -> Result<SelectStatement> {
        self.expect_keyword(Keyword::Select)?;
        self.expect(&Token::Asterisk)?;
        self.expect_keyword(Keyword::From)?;

        let table_name = self.expect_identifier()?;
        let where_clause = self.parse_where()?;

        Ok(SelectStatement {
            table_name,
            where_clause,
        })
    }

    // ========== UPDATE Statement ==========

    fn parse_update(&mut self) -> Result<UpdateStatement> {
        self.expect_keyword(Keyword::Update)?;

        let table_name = self.expect_identifier()?;

        self.expect_keyword(Keyword::Set)?;

        let column = self.expect_identifier()?;
        self.expect(&Token::Eq)?;
        let value = self.parse_literal()?;

        if self.check(&Token::Comma) {
            return Err(Error::Syntax(
                "UPDATE supports exactly one assignment".to_string(),
            ));
        }

        let where_clause = self.parse_where()?;

        Ok(UpdateStatement {
            table_name,
            assignment: Assignment { column, value },
            where_clause,
        })
    }

    // ========== DELETE Statement ==========

    fn parse_delete(&mut self) -> Result<DeleteStatement> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;

        let table_name = self.expect_identifier()?;
        let where_clause = self.parse_where()?;

        Ok(DeleteStatement {
            table_name,
            where_clause,
        })
    }

    // ========== WHERE Clause ==========

    /// Parse an optional `WHERE <column> = <literal>`
    fn parse_where(&mut self) -> Result<Option<WhereClause>> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        self.advance();

        let column = self.expect_identifier()?;

        match self.current() {
            Some(Token::Eq) => self.advance(),
            Some(token) => {
                return Err(Error::Syntax(format!(
                    "unsupported operator '{}' in WHERE clause, only '=' is supported",
                    token
                )))
            }
            None => return Err(Error::UnexpectedEnd("'='".to_string())),
        }

        let value = self.parse_literal()?;

        Ok(Some(WhereClause { column, value }))
    }

    // ========== Helper functions ==========

    fn parse_literal(&mut self) -> Result<Literal> {
        let literal = match self.current() {
            Some(Token::Number(n)) => Literal::Integer(*n),
            Some(Token::String(s)) => Literal::String(s.clone()),
            _ => return Err(self.unexpected("a number or string literal")),
        };
        self.advance();
        Ok(literal)
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>> {
        let mut identifiers = Vec::new();

        loop {
            identifiers.push(self.expect_identifier()?);

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(identifiers)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == Some(token)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().map_or(false, |t| t.is_keyword(keyword))
    }

    /// Build the error for an unexpected (or missing) current token
    fn unexpected(&self, expected: &str) -> Error {
        match self.current() {
            Some(token) => Error::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
            },
            None => Error::UnexpectedEnd(expected.to_string()),
        }
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", token)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.current() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }
}

/// Parse a single statement string
pub fn parse(sql: &str) -> Result<Option<Statement>> {
    Parser::new(sql)?.parse()
}

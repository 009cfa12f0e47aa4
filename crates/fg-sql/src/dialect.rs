//! SQL dialect abstraction

use sqlparser::ast::Expr;
use sqlparser::dialect::{
    Dialect, DuckDbDialect as SqlParserDuckDb, PostgreSqlDialect as SqlParserPostgres,
};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse exactly one SQL expression, rejecting trailing input
    fn parse_expr(&self, sql: &str) -> SqlResult<Expr> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptyPredicate);
        }
        let mut parser = Parser::new(self.parser_dialect())
            .try_with_sql(sql)
            .map_err(parse_error)?;
        let expr = parser.parse_expr().map_err(parse_error)?;
        let next = parser.peek_token();
        if next.token != Token::EOF {
            return Err(SqlError::ParseError {
                message: format!("unexpected '{}' after filter expression", next.token),
                line: next.span.start.line as usize,
                column: next.span.start.column as usize,
            });
        }
        Ok(expr)
    }

    /// Quote an identifier for this dialect
    fn quote_ident(&self, ident: &str) -> String;

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

fn parse_error(err: ParserError) -> SqlError {
    let msg = err.to_string();
    let (line, column) = parse_location_from_error(&msg);
    SqlError::ParseError {
        message: msg,
        line,
        column,
    }
}

/// Parse line and column from sqlparser error message.
///
/// `ParserError` is a plain string wrapper with no structured location data,
/// so "Line: N, Column: M" is extracted from the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

/// Double-quote an identifier, doubling embedded quotes.
fn quote_standard(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// DuckDB SQL dialect
#[derive(Default)]
pub struct DuckDbDialect {
    dialect: SqlParserDuckDb,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self::default()
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_standard(ident)
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

/// PostgreSQL dialect
#[derive(Default)]
pub struct PostgresDialect {
    dialect: SqlParserPostgres,
}

impl PostgresDialect {
    /// Create a new PostgreSQL dialect
    pub fn new() -> Self {
        Self::default()
    }
}

impl SqlDialect for PostgresDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_standard(ident)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Create a dialect from its configuration name
pub fn dialect_from_name(name: &str) -> SqlResult<Box<dyn SqlDialect>> {
    match name.to_lowercase().as_str() {
        "duckdb" => Ok(Box::new(DuckDbDialect::new())),
        "postgres" | "postgresql" => Ok(Box::new(PostgresDialect::new())),
        _ => Err(SqlError::UnknownDialect(name.to_string())),
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;

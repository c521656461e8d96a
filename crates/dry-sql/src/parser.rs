//! SQL parser wrapper

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

/// DuckDB SQL parser over sqlparser-rs
pub struct SqlParser {
    dialect: DuckDbDialect,
}

impl SqlParser {
    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: DuckDbDialect {},
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        Parser::parse_sql(&self.dialect, sql).map_err(|e| parse_error(e.to_string()))
    }

    /// Whether `sql` is exactly one query statement (SELECT, WITH, VALUES)
    pub fn is_single_query(&self, sql: &str) -> SqlResult<bool> {
        let statements = self.parse(sql)?;
        Ok(matches!(statements.as_slice(), [Statement::Query(_)]))
    }

    /// Parse `sql` and render each statement on its own
    pub fn split_statements(&self, sql: &str) -> SqlResult<Vec<String>> {
        Ok(self.parse(sql)?.iter().map(|s| s.to_string()).collect())
    }

    pub(crate) fn dialect(&self) -> &DuckDbDialect {
        &self.dialect
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::duckdb()
    }
}

/// Build a [`SqlError::ParseError`] from a sqlparser message
pub(crate) fn parse_error(message: String) -> SqlError {
    let (line, column) = parse_location_from_error(&message);
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// sqlparser errors carry their position only as "Line: N, Column: M" in
/// the message text. Returns `(0, 0)` when there is none.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = msg.find(label)? + label.len();
        let digits: String = msg[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    };

    match (number_after("Line: "), number_after("Column: ")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;

//! Byte-ranged SQL tokens
//!
//! Text-level rewrites run on tokens rather than raw string matching so
//! quoted identifiers, string literals and comments are never split. The
//! tokenizer accepts SQL the parser rejects.

use std::ops::Range;

use sqlparser::tokenizer::{Location, Token, Tokenizer};

use crate::error::SqlResult;
use crate::parser::{parse_error, SqlParser};

/// A token and the bytes of the input it was read from
pub(crate) struct SpannedToken {
    pub token: Token,
    pub range: Range<usize>,
}

/// Tokenize `sql` with the DuckDB dialect.
///
/// Whitespace and comments are kept as tokens, so the ranges cover the
/// whole input without gaps.
pub(crate) fn tokenize(sql: &str) -> SqlResult<Vec<SpannedToken>> {
    let parser = SqlParser::duckdb();
    let tokens = Tokenizer::new(parser.dialect(), sql)
        .tokenize_with_location()
        .map_err(|e| parse_error(e.to_string()))?;

    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(sql.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let starts: Vec<usize> = tokens
        .iter()
        .map(|t| byte_offset(sql, &line_starts, t.span.start))
        .collect();

    Ok(tokens
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let start = starts[i];
            let end = starts.get(i + 1).copied().unwrap_or(sql.len()).max(start);
            SpannedToken {
                token: t.token,
                range: start..end,
            }
        })
        .collect())
}

/// Tokenizer locations are 1-based lines and 1-based character columns
fn byte_offset(sql: &str, line_starts: &[usize], location: Location) -> usize {
    let line = (location.line as usize).saturating_sub(1);
    let Some(&line_start) = line_starts.get(line) else {
        return sql.len();
    };
    let column = (location.column as usize).saturating_sub(1);
    sql[line_start..]
        .char_indices()
        .nth(column)
        .map(|(i, _)| line_start + i)
        .unwrap_or(sql.len())
}

#[cfg(test)]
#[path = "tokens_test.rs"]
mod tests;

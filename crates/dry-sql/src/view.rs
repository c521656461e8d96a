//! View DDL wrapping
//!
//! View models are dry run as the DDL that would create them, so the
//! engine validates the statement exactly as it would be deployed.

use sqlparser::tokenizer::Token;

use crate::tokens::tokenize;

/// A `CREATE OR REPLACE VIEW` statement split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefinition {
    /// View name as written (quoted, qualified)
    pub name: String,
    /// The defining query
    pub query: String,
}

const VIEW_PREFIX: &str = "CREATE OR REPLACE VIEW ";

/// Wrap a query in `CREATE OR REPLACE VIEW <name> AS (...)`.
///
/// Trailing semicolons and comments are dropped so the query can sit
/// inside the parentheses.
pub fn wrap_in_view(qualified_name: &str, sql: &str) -> String {
    format!("{}{} AS (\n{}\n)", VIEW_PREFIX, qualified_name, query_body(sql))
}

/// `sql` up to its last token that is not whitespace, a comment or `;`
fn query_body(sql: &str) -> &str {
    let Ok(tokens) = tokenize(sql) else {
        return sql.trim().trim_end_matches(';').trim_end();
    };
    let end = tokens
        .iter()
        .rev()
        .find(|t| !matches!(t.token, Token::Whitespace(_) | Token::SemiColon | Token::EOF))
        .map_or(0, |t| t.range.end);
    sql[..end].trim()
}

/// Split a statement produced by [`wrap_in_view`] back into name and query.
///
/// Returns `None` for anything that is not a wrapped view.
pub fn unwrap_view(sql: &str) -> Option<ViewDefinition> {
    let sql = sql.trim();
    let head = sql.get(..VIEW_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(VIEW_PREFIX) {
        return None;
    }
    let rest = &sql[VIEW_PREFIX.len()..];

    let split = find_unquoted(rest, " AS (")?;
    let name = rest[..split].trim();
    let body = rest.get(split + " AS (".len()..)?.trim();
    let query = body.strip_suffix(')')?.trim();

    if name.is_empty() || query.is_empty() {
        return None;
    }

    Some(ViewDefinition {
        name: name.to_string(),
        query: query.to_string(),
    })
}

/// Byte offset of the first occurrence of `needle` outside double quotes
fn find_unquoted(haystack: &str, needle: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (idx, ch) in haystack.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if !in_quotes
            && haystack
                .get(idx..idx + needle.len())
                .is_some_and(|s| s.eq_ignore_ascii_case(needle))
        {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

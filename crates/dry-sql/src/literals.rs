//! Upstream literal substitution
//!
//! A dry run never reads upstream data. Instead, every reference to an
//! upstream relation is replaced by a one-row derived table whose columns
//! are `CAST(NULL AS <type>)` literals carrying the upstream's predicted
//! schema. The engine can then bind and describe the downstream query
//! without the upstream object existing.
//!
//! Matching works on the AST (`TableFactor::Table` names, 3-part
//! `database.schema.identifier` or 2-part `schema.identifier`, compared
//! case-insensitively). Matched names are swapped for unique placeholder
//! identifiers, the statements are rendered, and each placeholder is then
//! replaced by the literal text.
//!
//! SQL the parser rejects (DuckDB extensions sqlparser does not know, such
//! as `USING SAMPLE`) is rewritten on its tokens instead: dotted names that
//! match are replaced in place, and everything else is kept byte for byte.

use std::ops::ControlFlow;

use dry_core::sql_utils::quote_ident;
use dry_core::{Node, Table};
use sqlparser::ast::{Ident, ObjectName, ObjectNamePart, TableFactor, VisitMut, VisitorMut};
use sqlparser::keywords::{Keyword, RESERVED_FOR_TABLE_ALIAS};
use sqlparser::tokenizer::Token;

use crate::error::SqlResult;
use crate::parser::SqlParser;
use crate::tokens::{tokenize, SpannedToken};

const PLACEHOLDER_PREFIX: &str = "__dryflow_literal_";

/// Render the literal `SELECT` for a table schema.
///
/// ```
/// use dry_core::{Field, Table};
/// use dry_sql::select_literal;
///
/// let table = Table::new(vec![Field::new("id", "INTEGER")]);
/// assert_eq!(select_literal(&table), r#"SELECT CAST(NULL AS INTEGER) AS "id""#);
/// ```
pub fn select_literal(table: &Table) -> String {
    let columns = table
        .fields
        .iter()
        .map(|f| format!("CAST(NULL AS {}) AS {}", f.sql_type(), quote_ident(&f.name)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {}", columns)
}

/// Replace every reference to `upstream` in `sql` with a literal derived
/// table carrying `table`'s schema.
///
/// References that had an alias keep it; unaliased references are aliased
/// with the upstream identifier so qualified column references still
/// resolve. When `sql` does not reference the upstream, or `table` has no
/// fields, the input is returned unchanged.
pub fn replace_upstream_sql(sql: &str, upstream: &Node, table: &Table) -> SqlResult<String> {
    if table.is_empty() {
        return Ok(sql.to_string());
    }

    let mut statements = match SqlParser::duckdb().parse(sql) {
        Ok(statements) => statements,
        Err(e) => {
            log::debug!(
                "Substituting {} on tokens, SQL did not parse: {}",
                upstream.qualified_name(),
                e
            );
            return replace_upstream_tokens(sql, upstream, table);
        }
    };

    let mut replacer = UpstreamReplacer::new(upstream);
    for stmt in &mut statements {
        let _ = stmt.visit(&mut replacer);
    }

    if replacer.placeholders.is_empty() {
        return Ok(sql.to_string());
    }

    log::debug!(
        "Substituted {} reference(s) to {}",
        replacer.placeholders.len(),
        upstream.qualified_name()
    );

    let literal = select_literal(table);
    let mut rendered = statements
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(";\n");

    for (placeholder, had_alias) in &replacer.placeholders {
        let replacement = derived_table(&literal, upstream, *had_alias);
        rendered = rendered.replace(placeholder.as_str(), &replacement);
    }

    Ok(rendered)
}

fn derived_table(literal: &str, upstream: &Node, had_alias: bool) -> String {
    if had_alias {
        format!("({})", literal)
    } else {
        format!("({}) AS {}", literal, quote_ident(upstream.identifier()))
    }
}

/// Token-level substitution for SQL the parser rejects.
///
/// A reference is a dotted run of words (`a.b.c`, quoted or not) that is
/// neither preceded nor followed by another `.`. It counts as aliased when
/// the next word is `AS`, quoted, or not reserved after a table name.
fn replace_upstream_tokens(sql: &str, upstream: &Node, table: &Table) -> SqlResult<String> {
    let tokens = tokenize(sql)?;
    let target = UpstreamReplacer::new(upstream);
    let literal = select_literal(table);

    let mut rewritten = String::with_capacity(sql.len());
    let mut copied = 0;
    let mut replaced = 0;
    let mut idx = 0;
    while idx < tokens.len() {
        let Some((parts, next)) = dotted_name_at(&tokens, idx) else {
            idx += 1;
            continue;
        };
        if !target.matches_parts(&parts) {
            idx = next;
            continue;
        }

        let had_alias = has_alias(tokens[next..].iter().map(|t| &t.token));
        rewritten.push_str(&sql[copied..tokens[idx].range.start]);
        rewritten.push_str(&derived_table(&literal, upstream, had_alias));
        copied = tokens[next - 1].range.end;
        replaced += 1;
        idx = next;
    }

    if replaced == 0 {
        return Ok(sql.to_string());
    }
    rewritten.push_str(&sql[copied..]);

    log::debug!(
        "Substituted {} reference(s) to {}",
        replaced,
        upstream.qualified_name()
    );
    Ok(rewritten)
}

/// The parts of the dotted name starting at `start`, and the index just
/// past it
fn dotted_name_at(tokens: &[SpannedToken], start: usize) -> Option<(Vec<&str>, usize)> {
    if start > 0 && tokens[start - 1].token == Token::Period {
        return None;
    }

    let mut parts = Vec::new();
    let mut idx = start;
    loop {
        let Token::Word(word) = &tokens.get(idx)?.token else {
            return None;
        };
        parts.push(word.value.as_str());
        idx += 1;

        match tokens.get(idx).map(|t| &t.token) {
            Some(Token::Period) => idx += 1,
            _ => break,
        }
    }

    if parts.len() < 2 {
        return None;
    }
    Some((parts, idx))
}

fn has_alias<'t>(mut rest: impl Iterator<Item = &'t Token>) -> bool {
    match rest.find(|t| !matches!(t, Token::Whitespace(_))) {
        Some(Token::Word(word)) => {
            word.quote_style.is_some()
                || word.keyword == Keyword::AS
                || !RESERVED_FOR_TABLE_ALIAS.contains(&word.keyword)
        }
        _ => false,
    }
}

/// Swaps matching table names for placeholders, remembering whether each
/// reference carried its own alias
struct UpstreamReplacer<'a> {
    target: [&'a str; 3],
    placeholders: Vec<(String, bool)>,
}

impl<'a> UpstreamReplacer<'a> {
    fn new(upstream: &'a Node) -> Self {
        Self {
            target: [
                upstream.database.as_str(),
                upstream.schema.as_str(),
                upstream.identifier(),
            ],
            placeholders: Vec::new(),
        }
    }

    fn matches(&self, name: &ObjectName) -> bool {
        let parts: Option<Vec<&str>> = name
            .0
            .iter()
            .map(|part| match part {
                ObjectNamePart::Identifier(ident) => Some(ident.value.as_str()),
                _ => None,
            })
            .collect();
        parts.is_some_and(|parts| self.matches_parts(&parts))
    }

    fn matches_parts(&self, parts: &[&str]) -> bool {
        let expected: &[&str] = match parts.len() {
            3 => &self.target,
            2 => &self.target[1..],
            _ => return false,
        };
        parts
            .iter()
            .zip(expected)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl VisitorMut for UpstreamReplacer<'_> {
    type Break = ();

    fn post_visit_table_factor(&mut self, table_factor: &mut TableFactor) -> ControlFlow<()> {
        if let TableFactor::Table { name, alias, .. } = table_factor {
            if self.matches(name) {
                let placeholder = format!("{}{}__", PLACEHOLDER_PREFIX, self.placeholders.len());
                name.0 = vec![ObjectNamePart::Identifier(Ident::new(&placeholder))];
                self.placeholders.push((placeholder, alias.is_some()));
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
#[path = "literals_test.rs"]
mod tests;

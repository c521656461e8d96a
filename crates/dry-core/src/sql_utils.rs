//! SQL identifier quoting utilities
//!
//! Provides safe quoting for SQL identifiers and qualified names so that
//! generated dry-run statements never splice raw names into SQL text.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use dry_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote each part of a qualified name and join them with `.`.
///
/// Parts are taken verbatim, so a part containing a `.` stays a single
/// identifier.
///
/// # Examples
/// ```
/// use dry_core::sql_utils::quote_parts;
/// assert_eq!(quote_parts(&["db", "staging", "orders"]), r#""db"."staging"."orders""#);
/// ```
pub fn quote_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| quote_ident(p))
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

//! `like` pattern compilation.
//!
//! `%` matches any run of characters, `_` exactly one. Everything else is
//! literal. The pattern must match the whole value.

use crate::domain::QueryError;
use regex::Regex;

pub fn compile_like(pattern: &str) -> Result<Regex, QueryError> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push_str("(?s)^");
    let mut literal = String::new();

    for ch in pattern.chars() {
        match ch {
            '%' | '_' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if ch == '%' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');

    Regex::new(&expr).map_err(|e| QueryError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

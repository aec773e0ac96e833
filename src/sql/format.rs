use super::placeholder::scan_placeholders;

/// Seam for the external SQL formatting library.
///
/// Implementations receive text whose node placeholders have already been
/// masked as plain identifiers, so they can treat the input as ordinary SQL.
pub trait SqlFormatter: Send + Sync {
    fn format(&self, sql: &str) -> String;
}

/// Formats an expression while keeping `{{.nodeId}}` tokens intact.
///
/// Each placeholder is swapped for an opaque identifier before the
/// formatter runs and restored afterwards, so no formatter can corrupt the
/// reference syntax.
pub fn format_preserving_placeholders(sql: &str, formatter: &dyn SqlFormatter) -> String {
    let placeholders = scan_placeholders(sql);
    if placeholders.is_empty() {
        return formatter.format(sql);
    }

    let mut masked = String::with_capacity(sql.len());
    let mut cursor = 0;
    for (i, ph) in placeholders.iter().enumerate() {
        masked.push_str(&sql[cursor..ph.start]);
        masked.push_str(&mask_token(i));
        cursor = ph.end;
    }
    masked.push_str(&sql[cursor..]);

    let mut formatted = formatter.format(&masked);
    for (i, ph) in placeholders.iter().enumerate() {
        formatted = formatted.replace(&mask_token(i), &sql[ph.start..ph.end]);
    }
    formatted
}

fn mask_token(index: usize) -> String {
    format!("__vs_node_ref_{}__", index)
}

/// A conservative built-in formatter: collapses whitespace, uppercases
/// keywords, and starts a new line before each major clause. Quoted
/// literals pass through untouched.
pub struct BasicFormatter;

const KEYWORDS: [&str; 24] = [
    "select", "from", "where", "join", "inner", "left", "right", "full", "outer", "on", "group",
    "by", "order", "limit", "offset", "union", "all", "distinct", "as", "and", "or", "not",
    "having", "with",
];

const CLAUSE_STARTERS: [&str; 7] = ["FROM", "WHERE", "GROUP", "ORDER", "LIMIT", "UNION", "HAVING"];

impl SqlFormatter for BasicFormatter {
    fn format(&self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len());
        for (i, token) in tokenize(sql).iter().enumerate() {
            let word = if token.starts_with('\'') {
                token.clone()
            } else if KEYWORDS.contains(&token.to_ascii_lowercase().as_str()) {
                token.to_ascii_uppercase()
            } else {
                token.clone()
            };

            if i > 0 {
                if CLAUSE_STARTERS.contains(&word.as_str()) {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            out.push_str(&word);
        }
        out
    }
}

/// Splits on whitespace outside single-quoted literals.
fn tokenize(sql: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in sql.chars() {
        if c == '\'' {
            in_quote = !in_quote;
            current.push(c);
        } else if c.is_whitespace() && !in_quote {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

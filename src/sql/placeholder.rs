/// One `{{.nodeId}}` reference inside a SQL expression.
///
/// `start`/`end` are byte offsets of the whole token, braces included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub node_id: String,
    pub start: usize,
    pub end: usize,
}

/// Scans `sql` for node placeholders, left to right.
///
/// A token only counts when the braces wrap `.` followed by a plain id
/// (no whitespace, no nested braces); anything else is left as ordinary
/// SQL text.
pub fn scan_placeholders(sql: &str) -> Vec<Placeholder> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if &bytes[i..i + 2] != b"{{" {
            i += 1;
            continue;
        }
        let Some(close) = sql[i + 2..].find("}}") else {
            break;
        };
        let inner = sql[i + 2..i + 2 + close].trim();
        let end = i + 2 + close + 2;

        if let Some(id) = inner.strip_prefix('.') {
            let valid = !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if valid {
                found.push(Placeholder {
                    node_id: id.to_string(),
                    start: i,
                    end,
                });
            }
        }
        i = end;
    }
    found
}

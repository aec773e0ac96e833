//! Tests for placeholder scanning and format protection.
use viewscope::prelude::*;
use viewscope::sql::scan_placeholders;

#[test]
fn scans_placeholders_left_to_right() {
    let sql = "select a.id from {{.node_a}} a join {{.node-b}} b on a.id = b.id";
    let found = scan_placeholders(sql);

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].node_id, "node_a");
    assert_eq!(found[1].node_id, "node-b");
    assert_eq!(&sql[found[0].start..found[0].end], "{{.node_a}}");
}

#[test]
fn ignores_tokens_that_are_not_node_references() {
    // No leading dot, embedded whitespace, empty id, unclosed braces.
    let sql = "select {{col}} from {{. bad }} where x = '{{.}}' and y = {{.open";
    assert!(scan_placeholders(sql).is_empty());
}

#[test]
fn formatting_keeps_placeholders_intact() {
    let sql = "select id, amount from {{.a1b2c3}} where status = 'select from' order by id";
    let formatted = format_preserving_placeholders(sql, &BasicFormatter);

    assert!(formatted.contains("{{.a1b2c3}}"));
    assert!(formatted.contains("SELECT id, amount"));
    // Quoted literals are not keyword-cased.
    assert!(formatted.contains("'select from'"));
    assert!(formatted.contains("\nORDER BY id"));
}

#[test]
fn formatting_restores_every_placeholder_once() {
    let sql = "select * from {{.first}} union all select * from {{.second}}";
    let formatted = format_preserving_placeholders(sql, &BasicFormatter);

    assert_eq!(formatted.matches("{{.first}}").count(), 1);
    assert_eq!(formatted.matches("{{.second}}").count(), 1);
    assert!(!formatted.contains("__vs_node_ref_"));
}

#[test]
fn a_custom_formatter_only_sees_masked_text() {
    struct Recorder(std::sync::Mutex<String>);
    impl SqlFormatter for Recorder {
        fn format(&self, sql: &str) -> String {
            *self.0.lock().unwrap() = sql.to_string();
            sql.to_string()
        }
    }

    let recorder = Recorder(std::sync::Mutex::new(String::new()));
    let sql = "select * from {{.n1}}";
    format_preserving_placeholders(sql, &recorder);

    let seen = recorder.0.lock().unwrap();
    assert!(!seen.contains("{{.n1}}"));
    assert!(seen.contains("__vs_node_ref_0__"));
}

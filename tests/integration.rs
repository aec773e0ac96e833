//! End-to-end scenarios: build, invalidate, save and reload a whole view.
mod common;
use common::*;
use viewscope::prelude::*;

#[test]
fn build_edit_save_and_reload() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);

    let (orders, customers, join, output) = build_full_chain(&mut editor, &registry, &catalog);

    // Everything configured: four success nodes, three edges.
    assert!(
        editor
            .graph()
            .nodes()
            .all(|n| n.status() == NodeStatus::Success)
    );
    assert_eq!(editor.graph().edges().len(), 3);

    // Save.
    let mut def = DataViewDefinition::new("dv-42", "Orders by customer", QueryType::Sql);
    def.primary_keys = vec!["id_Orders".to_string()];
    editor.graph().apply_to(&mut def);
    let json = def.to_json().unwrap();

    // The persisted shape carries the dual bookkeeping.
    let reloaded_def = DataViewDefinition::from_json(&json).unwrap();
    let join_raw = reloaded_def
        .data_scope
        .iter()
        .find(|n| n.id == join)
        .unwrap();
    assert_eq!(join_raw.input_nodes, vec![orders.clone(), customers.clone()]);
    assert_eq!(join_raw.output_nodes, vec![output.clone()]);

    // Reload and keep editing: disconnecting upstream must cascade exactly
    // like it does on a freshly built graph.
    let mut editor = Editor::from_definition(&reloaded_def).unwrap();
    editor
        .apply(EditorAction::Disconnect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();

    let graph = editor.graph();
    assert_eq!(graph.node(&join).unwrap().status(), NodeStatus::Error);
    assert!(graph.node(&join).unwrap().output_fields.is_empty());
    assert_eq!(graph.node(&output).unwrap().status(), NodeStatus::Error);
    assert_eq!(
        graph.node(&customers).unwrap().status(),
        NodeStatus::Success
    );
}

#[test]
fn repairing_an_invalidated_chain_bottom_up() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let (orders, _, join, output) = build_full_chain(&mut editor, &registry, &catalog);

    editor
        .apply(EditorAction::Disconnect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();
    editor
        .apply(EditorAction::Connect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();

    // Still broken until each affected form is resubmitted, top to bottom.
    assert_eq!(editor.graph().node(&join).unwrap().status(), NodeStatus::Error);

    editor
        .submit_form(
            &registry,
            &catalog,
            &join,
            &FormDraft::Join(JoinDraft {
                join_type: JoinType::Inner,
                left_key: Some("id".to_string()),
                right_key: Some("id".to_string()),
                selected: vec!["id_Orders".to_string(), "amount".to_string()],
            }),
        )
        .unwrap();
    assert_eq!(
        editor.graph().node(&join).unwrap().status(),
        NodeStatus::Success
    );

    // The output node was invalidated too and stays broken independently.
    assert_eq!(
        editor.graph().node(&output).unwrap().status(),
        NodeStatus::Error
    );
    editor
        .submit_form(
            &registry,
            &catalog,
            &output,
            &FormDraft::Output(OutputDraft {
                selected: vec!["amount".to_string()],
            }),
        )
        .unwrap();
    assert!(
        editor
            .graph()
            .nodes()
            .all(|n| n.status() == NodeStatus::Success)
    );
}

#[test]
fn sql_node_over_a_reloaded_graph() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let orders = add_configured_view(&mut editor, &registry, &catalog, "orders", "Orders");

    let sql = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Sql,
            title: "Totals".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    let expression = format!(
        "select status, sum(amount) as total from {{{{.{}}}}} group by status",
        orders
    );
    editor
        .submit_form(
            &registry,
            &catalog,
            &sql,
            &FormDraft::Sql(SqlDraft {
                sql_expression: expression.clone(),
            }),
        )
        .unwrap();

    let mut def = DataViewDefinition::new("dv-7", "Totals", QueryType::Sql);
    editor.graph().apply_to(&mut def);
    let reloaded = DataViewDefinition::from_json(&def.to_json().unwrap()).unwrap();

    let sql_raw = reloaded.data_scope.iter().find(|n| n.id == sql).unwrap();
    match &sql_raw.config {
        viewscope::definition::NodeConfig::Sql(config) => {
            assert_eq!(config.sql_expression, expression);
            let formatted = format_preserving_placeholders(&config.sql_expression, &BasicFormatter);
            assert!(formatted.contains(&format!("{{{{.{}}}}}", orders)));
        }
        other => panic!("expected a sql config, got {:?}", other),
    }
    assert_eq!(sql_raw.node_status, NodeStatus::Success);
    assert!(sql_raw.output_fields.is_empty());
}

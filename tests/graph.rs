//! Tests for structural graph rules, propagation and (de)serialization.
mod common;
use common::*;
use viewscope::prelude::*;

fn editor_with_chain() -> (Editor, String, String, String, String) {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let (orders, customers, join, output) = build_full_chain(&mut editor, &registry, &catalog);
    (editor, orders, customers, join, output)
}

#[test]
fn second_outgoing_edge_is_rejected() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let orders = add_configured_view(&mut editor, &registry, &catalog, "orders", "Orders");

    let out1 = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Out 1".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    let out2 = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Out 2".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();

    editor
        .apply(EditorAction::Connect {
            source: orders.clone(),
            target: out1,
        })
        .unwrap();

    let result = editor.apply(EditorAction::Connect {
        source: orders.clone(),
        target: out2,
    });
    assert_eq!(
        result,
        Err(GraphError::FanOutExceeded {
            node_id: orders.clone()
        })
    );

    // The rejected edge never entered the model.
    assert_eq!(editor.graph().edges().len(), 1);
    assert_eq!(editor.graph().outputs_of(&orders).len(), 1);
}

#[test]
fn unconfigured_source_cannot_feed() {
    let mut editor = Editor::new(QueryType::Sql);
    let view = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::View,
            title: "Raw".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    let output = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Out".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();

    let result = editor.apply(EditorAction::Connect {
        source: view.clone(),
        target: output,
    });
    assert_eq!(result, Err(GraphError::SourceInvalid { node_id: view }));
}

#[test]
fn view_nodes_take_no_inputs() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let orders = add_configured_view(&mut editor, &registry, &catalog, "orders", "Orders");
    let customers = add_configured_view(&mut editor, &registry, &catalog, "customers", "Customers");

    let result = editor.apply(EditorAction::Connect {
        source: orders,
        target: customers.clone(),
    });
    assert_eq!(
        result,
        Err(GraphError::TargetTakesNoInputs {
            node_id: customers,
            kind: NodeKind::View,
        })
    );
}

#[test]
fn output_nodes_are_terminal() {
    let (mut editor, _, _, _, output) = editor_with_chain();
    let extra = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Extra".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();

    let result = editor.apply(EditorAction::Connect {
        source: output.clone(),
        target: extra,
    });
    assert_eq!(result, Err(GraphError::TerminalSource { node_id: output }));
}

#[test]
fn join_accepts_at_most_two_inputs() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let (_, _, join) = build_joined_pair(&mut editor, &registry, &catalog);
    let third = add_configured_view(&mut editor, &registry, &catalog, "orders", "More orders");

    let result = editor.apply(EditorAction::Connect {
        source: third,
        target: join.clone(),
    });
    assert_eq!(
        result,
        Err(GraphError::InputLimitReached {
            node_id: join,
            kind: NodeKind::Join,
            limit: 2,
        })
    );
}

#[test]
fn output_accepts_one_input() {
    let (mut editor, _, customers, join, output) = editor_with_chain();

    // Free the customers view so it can source again.
    editor
        .apply(EditorAction::Disconnect {
            source: customers.clone(),
            target: join,
        })
        .unwrap();

    let result = editor.apply(EditorAction::Connect {
        source: customers,
        target: output.clone(),
    });
    assert_eq!(
        result,
        Err(GraphError::InputLimitReached {
            node_id: output,
            kind: NodeKind::Output,
            limit: 1,
        })
    );
}

#[test]
fn duplicate_edge_is_rejected() {
    let catalog = sample_catalog();
    let registry = FormRegistry::new();
    let mut editor = Editor::new(QueryType::Sql);
    let orders = add_configured_view(&mut editor, &registry, &catalog, "orders", "Orders");
    let join = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Join,
            title: "Join".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();

    editor
        .apply(EditorAction::Connect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();
    let result = editor.apply(EditorAction::Connect {
        source: orders.clone(),
        target: join.clone(),
    });
    assert_eq!(
        result,
        Err(GraphError::EdgeExists {
            from_node: orders,
            target: join,
        })
    );
}

#[test]
fn disconnect_invalidates_whole_downstream() {
    let (mut editor, orders, customers, join, output) = editor_with_chain();

    editor
        .apply(EditorAction::Disconnect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();

    let graph = editor.graph();
    let join_node = graph.node(&join).unwrap();
    assert_eq!(join_node.status(), NodeStatus::Error);
    assert!(join_node.output_fields.is_empty());

    let output_node = graph.node(&output).unwrap();
    assert_eq!(output_node.status(), NodeStatus::Error);
    assert!(output_node.output_fields.is_empty());

    // The disconnected source and the unaffected sibling keep their state.
    let orders_node = graph.node(&orders).unwrap();
    assert_eq!(orders_node.status(), NodeStatus::Success);
    assert_eq!(orders_node.output_fields.len(), 3);
    let customers_node = graph.node(&customers).unwrap();
    assert_eq!(customers_node.status(), NodeStatus::Success);
    assert_eq!(customers_node.output_fields.len(), 2);
}

#[test]
fn reconnecting_does_not_clear_error() {
    let (mut editor, orders, _, join, _) = editor_with_chain();

    editor
        .apply(EditorAction::Disconnect {
            source: orders.clone(),
            target: join.clone(),
        })
        .unwrap();
    editor
        .apply(EditorAction::Connect {
            source: orders,
            target: join.clone(),
        })
        .unwrap();

    // Only the join's own form submit can grant success again.
    assert_eq!(
        editor.graph().node(&join).unwrap().status(),
        NodeStatus::Error
    );
}

#[test]
fn node_removal_cascades_like_disconnect() {
    let (mut editor, orders, _, join, output) = editor_with_chain();

    editor
        .apply(EditorAction::RemoveNode { id: orders.clone() })
        .unwrap();

    let graph = editor.graph();
    assert!(graph.node(&orders).is_none());
    // No edge may still reference the removed node.
    assert!(
        graph
            .edges()
            .iter()
            .all(|e| e.source != orders && e.target != orders)
    );

    assert_eq!(graph.node(&join).unwrap().status(), NodeStatus::Error);
    assert!(graph.node(&join).unwrap().output_fields.is_empty());
    assert_eq!(graph.node(&output).unwrap().status(), NodeStatus::Error);
}

#[test]
fn titles_are_deduped_within_one_view() {
    let mut editor = Editor::new(QueryType::Sql);
    let first = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::View,
            title: "Orders".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    let second = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::View,
            title: "Orders".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();

    let first_title = &editor.graph().node(&first).unwrap().title;
    let second_title = &editor.graph().node(&second).unwrap().title;
    assert_eq!(first_title, "Orders");
    assert_ne!(second_title, "Orders");
    assert!(second_title.starts_with("Orders_"));
}

#[test]
fn round_trip_reproduces_the_graph() {
    let (mut editor, ..) = editor_with_chain();
    editor.format_layout();

    let mut def = DataViewDefinition::new("dv-1", "Chain", QueryType::Sql);
    editor.graph().apply_to(&mut def);

    let json = def.to_json().unwrap();
    let reloaded_def = DataViewDefinition::from_json(&json).unwrap();
    assert_eq!(def, reloaded_def);

    let reloaded = ViewGraph::from_definition(&reloaded_def).unwrap();
    let original = editor.graph();

    assert_eq!(original.len(), reloaded.len());
    assert_eq!(original.edges(), reloaded.edges());
    for node in original.nodes() {
        let other = reloaded.node(&node.id).unwrap();
        assert_eq!(node.kind, other.kind);
        assert_eq!(node.title, other.title);
        assert_eq!(node.position, other.position);
        assert_eq!(node.config, other.config);
        assert_eq!(node.output_fields, other.output_fields);
        assert_eq!(node.status(), other.status());
    }
}

#[test]
fn load_rejects_dangling_input_reference() {
    let mut def = DataViewDefinition::new("dv-1", "Broken", QueryType::Sql);
    let mut node = raw_node(
        "a",
        NodeKind::Output,
        Vec::new(),
        NodeStatus::Error,
    );
    node.input_nodes = vec!["ghost".to_string()];
    def.data_scope.push(node);

    let result = ViewGraph::from_definition(&def);
    assert_eq!(
        result.err(),
        Some(DefinitionError::UnknownInputNode {
            node_id: "a".to_string(),
            missing_id: "ghost".to_string(),
        })
    );
}

#[test]
fn load_rejects_drifted_edge_bookkeeping() {
    let mut def = DataViewDefinition::new("dv-1", "Broken", QueryType::Sql);
    let mut a = raw_node(
        "a",
        NodeKind::View,
        vec![field("id", "int")],
        NodeStatus::Success,
    );
    // `a` claims to feed `b`, but `b` does not list `a` as an input.
    a.output_nodes = vec!["b".to_string()];
    def.data_scope.push(a);
    def.data_scope
        .push(raw_node("b", NodeKind::Output, Vec::new(), NodeStatus::Error));

    let result = ViewGraph::from_definition(&def);
    assert_eq!(
        result.err(),
        Some(DefinitionError::MirrorMismatch {
            from_node: "a".to_string(),
            target: "b".to_string(),
        })
    );
}

#[test]
fn load_rejects_fan_out() {
    let mut def = DataViewDefinition::new("dv-1", "Broken", QueryType::Sql);
    let mut a = raw_node(
        "a",
        NodeKind::View,
        vec![field("id", "int")],
        NodeStatus::Success,
    );
    a.output_nodes = vec!["b".to_string(), "c".to_string()];
    def.data_scope.push(a);
    for id in ["b", "c"] {
        let mut node = raw_node(id, NodeKind::Output, Vec::new(), NodeStatus::Error);
        node.input_nodes = vec!["a".to_string()];
        def.data_scope.push(node);
    }

    let result = ViewGraph::from_definition(&def);
    assert_eq!(
        result.err(),
        Some(DefinitionError::FanOutExceeded("a".to_string()))
    );
}

#[test]
fn connect_rejects_cycles_in_degenerate_loaded_graphs() {
    // A hand-written definition can carry edges the editor would never
    // create; a later connect must still refuse to close a loop.
    let mut def = DataViewDefinition::new("dv-1", "Degenerate", QueryType::Sql);
    let mut a = raw_node(
        "a",
        NodeKind::View,
        vec![field("id", "int")],
        NodeStatus::Success,
    );
    a.input_nodes = vec!["b".to_string()];
    def.data_scope.push(a);
    let mut b = raw_node("b", NodeKind::Sql, Vec::new(), NodeStatus::Success);
    b.output_nodes = vec!["a".to_string()];
    def.data_scope.push(b);

    let mut graph = ViewGraph::from_definition(&def).unwrap();
    let result = graph.connect("a", "b");
    assert_eq!(
        result,
        Err(GraphError::CycleDetected {
            from_node: "a".to_string(),
            target: "b".to_string(),
        })
    );
}

#[test]
fn downstream_of_covers_the_transitive_closure() {
    let (editor, orders, customers, join, output) = editor_with_chain();
    let graph = editor.graph();

    let downstream = graph.downstream_of(&orders);
    assert!(downstream.contains(&orders));
    assert!(downstream.contains(&join));
    assert!(downstream.contains(&output));
    assert!(!downstream.contains(&customers));
}

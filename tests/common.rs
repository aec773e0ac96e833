//! Common test utilities for building catalogs, graphs and definitions.
use viewscope::prelude::*;

#[allow(dead_code)]
pub fn field(name: &str, field_type: &str) -> Field {
    Field::new(name, field_type)
}

/// A catalog with two simple views sharing an integer `id` key.
#[allow(dead_code)]
pub fn sample_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(
        "orders",
        vec![
            field("id", "int"),
            field("amount", "double"),
            field("status", "varchar"),
        ],
    );
    catalog.insert(
        "customers",
        vec![field("id", "int"), field("name", "varchar")],
    );
    catalog
}

/// Adds a `view` node referencing `view_id` and submits its reference form
/// with every catalog field selected.
#[allow(dead_code)]
pub fn add_configured_view(
    editor: &mut Editor,
    registry: &FormRegistry,
    catalog: &InMemoryCatalog,
    view_id: &str,
    title: &str,
) -> String {
    let id = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::View,
            title: title.to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    let fields = catalog.view_fields(view_id).unwrap();
    editor
        .submit_form(
            registry,
            catalog,
            &id,
            &FormDraft::Reference(ReferenceDraft {
                view_id: view_id.to_string(),
                picks: fields.iter().map(|f| FieldPick::selected(f.name.as_str())).collect(),
            }),
        )
        .unwrap();
    id
}

/// Two configured views feeding a configured join on `id`.
/// Returns `(orders_node, customers_node, join_node)`.
#[allow(dead_code)]
pub fn build_joined_pair(
    editor: &mut Editor,
    registry: &FormRegistry,
    catalog: &InMemoryCatalog,
) -> (String, String, String) {
    let orders = add_configured_view(editor, registry, catalog, "orders", "Orders");
    let customers = add_configured_view(editor, registry, catalog, "customers", "Customers");

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
    editor
        .apply(EditorAction::Connect {
            source: customers.clone(),
            target: join.clone(),
        })
        .unwrap();

    editor
        .submit_form(
            registry,
            catalog,
            &join,
            &FormDraft::Join(JoinDraft {
                join_type: JoinType::Inner,
                left_key: Some("id".to_string()),
                right_key: Some("id".to_string()),
                selected: vec![
                    "id_Orders".to_string(),
                    "amount".to_string(),
                    "name".to_string(),
                ],
            }),
        )
        .unwrap();
    (orders, customers, join)
}

/// Extends [`build_joined_pair`] with a configured output node fed by the
/// join. Returns `(orders, customers, join, output)`.
#[allow(dead_code)]
pub fn build_full_chain(
    editor: &mut Editor,
    registry: &FormRegistry,
    catalog: &InMemoryCatalog,
) -> (String, String, String, String) {
    let (orders, customers, join) = build_joined_pair(editor, registry, catalog);

    let output = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Published".to_string(),
            config: None,
        })
        .unwrap()
        .unwrap();
    editor
        .apply(EditorAction::Connect {
            source: join.clone(),
            target: output.clone(),
        })
        .unwrap();
    editor
        .submit_form(
            registry,
            catalog,
            &output,
            &FormDraft::Output(OutputDraft {
                selected: vec!["id_Orders".to_string(), "amount".to_string()],
            }),
        )
        .unwrap();
    (orders, customers, join, output)
}

/// A persisted node descriptor with sensible defaults for hand-built
/// definitions.
#[allow(dead_code)]
pub fn raw_node(id: &str, kind: NodeKind, fields: Vec<Field>, status: NodeStatus) -> Node {
    Node {
        id: id.to_string(),
        kind,
        title: id.to_string(),
        position: Position::default(),
        input_nodes: Vec::new(),
        output_nodes: Vec::new(),
        config: NodeConfig::empty_for(kind),
        output_fields: fields,
        node_status: status,
    }
}

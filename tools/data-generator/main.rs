use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use viewscope::prelude::*;

/// A CLI tool to generate sample data view definitions for testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated definition JSON to
    #[arg(short, long, default_value = "generated_view.json")]
    output: String,

    /// Number of source view nodes to generate (the first two feed a join)
    #[arg(long, default_value_t = 3)]
    sources: usize,

    /// Apply the grid layout before writing
    #[arg(long, default_value_t = true)]
    layout: bool,
}

const FIELD_POOL: [(&str, &str); 8] = [
    ("amount", "double"),
    ("status", "varchar"),
    ("created_at", "timestamp"),
    ("region", "varchar"),
    ("quantity", "int"),
    ("active", "boolean"),
    ("category", "varchar"),
    ("score", "double"),
];

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.sources < 2 {
        eprintln!("Error: --sources must be at least 2");
        std::process::exit(1);
    }

    println!("Generating definition with {} source view(s)...", cli.sources);

    let mut catalog = InMemoryCatalog::new();
    let mut editor = Editor::new(QueryType::Sql);
    let registry = FormRegistry::new();

    let mut view_nodes: Vec<(String, String, Vec<Field>)> = Vec::new();
    for i in 0..cli.sources {
        let view_id = format!("src_view_{}", i);
        let title = format!("Source {}", i);
        let fields = generate_fields(&mut rng, i);
        catalog.insert(view_id.clone(), fields.clone());

        let node_id = editor
            .apply(EditorAction::AddNode {
                kind: NodeKind::View,
                title: title.clone(),
                config: None,
            })?
            .expect("AddNode returns the new id");
        editor.submit_form(
            &registry,
            &catalog,
            &node_id,
            &FormDraft::Reference(ReferenceDraft {
                view_id: view_id.clone(),
                picks: fields.iter().map(|f| FieldPick::selected(f.name.as_str())).collect(),
            }),
        )?;
        println!("-> Generated view node '{}' ({} fields).", title, fields.len());
        view_nodes.push((node_id, title, fields));
    }

    // Join the first two sources on their shared integer key.
    let join_id = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Join,
            title: "Joined".to_string(),
            config: None,
        })?
        .expect("AddNode returns the new id");
    for (node_id, _, _) in view_nodes.iter().take(2) {
        editor.apply(EditorAction::Connect {
            source: node_id.clone(),
            target: join_id.clone(),
        })?;
    }

    let selected = combined_selection(&view_nodes[0], &view_nodes[1]);
    let outcome = editor.submit_form(
        &registry,
        &catalog,
        &join_id,
        &FormDraft::Join(JoinDraft {
            join_type: JoinType::Inner,
            left_key: Some("id".to_string()),
            right_key: Some("id".to_string()),
            selected,
        }),
    )?;
    println!("-> Joined the first two sources ({} fields).", outcome.output_fields.len());

    // Publish everything the join produces.
    let output_id = editor
        .apply(EditorAction::AddNode {
            kind: NodeKind::Output,
            title: "Published".to_string(),
            config: None,
        })?
        .expect("AddNode returns the new id");
    editor.apply(EditorAction::Connect {
        source: join_id.clone(),
        target: output_id.clone(),
    })?;
    editor.submit_form(
        &registry,
        &catalog,
        &output_id,
        &FormDraft::Output(OutputDraft {
            selected: outcome.output_fields.iter().map(|f| f.name.clone()).collect(),
        }),
    )?;

    if cli.layout {
        editor.format_layout();
    }

    let mut def = DataViewDefinition::new("generated", "Generated view", QueryType::Sql);
    editor.graph().apply_to(&mut def);
    fs::write(&cli.output, def.to_json()?)?;

    println!(
        "Successfully generated and saved definition to '{}'",
        cli.output
    );
    Ok(())
}

/// Every source shares an integer `id` key plus a random slice of the pool.
fn generate_fields(rng: &mut ThreadRng, source_index: usize) -> Vec<Field> {
    let mut fields = vec![Field::new("id", "int")];
    let count = rng.random_range(2..=4);
    let offset = rng.random_range(0..FIELD_POOL.len());

    for i in 0..count {
        let (name, field_type) = FIELD_POOL[(offset + i) % FIELD_POOL.len()];
        fields.push(
            Field::new(name, field_type)
                .with_comment(format!("generated for source {}", source_index)),
        );
    }
    fields
}

/// Mirrors the join form's collision suffixing so the selection names line
/// up with the combined field list it builds.
fn combined_selection(
    left: &(String, String, Vec<Field>),
    right: &(String, String, Vec<Field>),
) -> Vec<String> {
    let mut selected = Vec::new();
    for (side, other) in [(left, right), (right, left)] {
        for field in &side.2 {
            if other.2.iter().any(|o| o.name == field.name) {
                selected.push(format!("{}_{}", field.name, side.1));
            } else {
                selected.push(field.name.clone());
            }
        }
    }
    selected
}

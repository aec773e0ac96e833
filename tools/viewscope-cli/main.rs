use clap::{Parser, Subcommand};
use std::fs;
use viewscope::prelude::*;

/// Inspect and maintain persisted custom data view definitions.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a definition and check its graph invariants
    Validate {
        /// Path to the definition JSON
        definition: String,
    },
    /// Print nodes, edges and schemas
    Inspect {
        definition: String,
    },
    /// Normalize every sql node's expression, keeping `{{.nodeId}}` intact
    FormatSql {
        definition: String,
        /// Write the updated definition here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Re-position all nodes on a depth-ordered grid
    Layout {
        definition: String,
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate { definition } => validate(&definition),
        Command::Inspect { definition } => inspect(&definition),
        Command::FormatSql { definition, output } => format_sql(&definition, output.as_deref()),
        Command::Layout { definition, output } => layout(&definition, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load(path: &str) -> Result<(DataViewDefinition, Editor)> {
    let json = fs::read_to_string(path)?;
    let def = DataViewDefinition::from_json(&json)?;
    let editor = Editor::from_definition(&def)?;
    Ok((def, editor))
}

fn write_out(def: &DataViewDefinition, output: Option<&str>) -> Result<()> {
    let json = def.to_json()?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote updated definition to '{}'", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn validate(path: &str) -> Result<()> {
    let (def, editor) = load(path)?;
    let graph = editor.graph();

    println!("Definition '{}' ({} nodes)", def.name, graph.len());

    let mut incomplete = 0;
    let mut errors = 0;
    for node in graph.nodes() {
        let inputs = graph.inputs_of(&node.id).len();
        let mut notes = Vec::new();

        if node.status() == NodeStatus::Error {
            errors += 1;
            notes.push("status error".to_string());
        }
        if let Some(required) = node.kind.required_inputs() {
            if inputs != required {
                incomplete += 1;
                notes.push(format!("{} of {} inputs connected", inputs, required));
            }
        }

        let marker = if notes.is_empty() { "ok" } else { "!!" };
        println!(
            "  [{}] {} '{}' ({}){}",
            marker,
            node.id,
            node.title,
            node.kind,
            if notes.is_empty() {
                String::new()
            } else {
                format!(" - {}", notes.join(", "))
            }
        );
    }

    println!();
    if incomplete == 0 && errors == 0 {
        println!("All {} node(s) configured and fully wired.", graph.len());
    } else {
        println!(
            "{} node(s) in error state, {} with missing inputs.",
            errors, incomplete
        );
        std::process::exit(1);
    }
    Ok(())
}

fn inspect(path: &str) -> Result<()> {
    let (def, editor) = load(path)?;
    let graph = editor.graph();

    println!("{} ({:?})", def.name, def.query_type);
    for node in graph.nodes() {
        println!("  {} '{}' ({})", node.id, node.title, node.kind);
        for field in &node.output_fields {
            println!("    - {} {}", field.name, field.field_type);
        }
    }
    println!("Edges:");
    for edge in graph.edges() {
        println!("  {} -> {}", edge.source, edge.target);
    }
    Ok(())
}

fn format_sql(path: &str, output: Option<&str>) -> Result<()> {
    let (mut def, _) = load(path)?;
    let formatter = BasicFormatter;

    let mut formatted = 0;
    for node in &mut def.data_scope {
        if let NodeConfig::Sql(config) = &mut node.config {
            config.sql_expression =
                format_preserving_placeholders(&config.sql_expression, &formatter);
            formatted += 1;
        }
    }
    println!("Formatted {} sql node(s).", formatted);
    write_out(&def, output)
}

fn layout(path: &str, output: Option<&str>) -> Result<()> {
    let (mut def, mut editor) = load(path)?;
    editor.format_layout();
    editor.graph().apply_to(&mut def);
    println!("Re-positioned {} node(s).", editor.graph().len());
    write_out(&def, output)
}

//! Schema command implementation

use anyhow::{Context, Result};
use fg_core::SchemaRegistry;
use serde_json::{json, Value};

use crate::cli::{GlobalArgs, SchemaArgs, SchemaOutput};
use crate::context::load_config;

/// Execute the schema command
pub async fn execute(args: &SchemaArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let registry = config
        .schema_registry()
        .context("Invalid schema in configuration")?;

    if global.verbose {
        eprintln!(
            "[verbose] Project '{}': dialect {}, default depth {}, policy {}",
            config.name, config.dialect, config.default_depth, config.on_invalid_reference
        );
    }

    match args.output {
        SchemaOutput::Text => print!("{}", render_text(&registry)),
        SchemaOutput::Json => println!("{}", serde_json::to_string_pretty(&render_json(&registry))?),
    }
    Ok(())
}

fn render_text(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for table in registry.tables() {
        out.push_str(&format!(
            "{} (pk: {}): {}\n",
            table.name(),
            table.primary_key(),
            table.columns().join(", ")
        ));
        for edge in table.edges() {
            out.push_str(&format!(
                "  {}: {} -> {}.{}{}\n",
                edge.name,
                edge.from_column,
                edge.to_table,
                edge.to_column,
                if edge.nullable { " (nullable)" } else { "" }
            ));
        }
    }
    out
}

fn render_json(registry: &SchemaRegistry) -> Value {
    let tables: Vec<Value> = registry
        .tables()
        .map(|table| {
            let edges: Vec<Value> = table
                .edges()
                .iter()
                .map(|edge| {
                    json!({
                        "name": edge.name,
                        "column": edge.from_column,
                        "references": {"table": edge.to_table, "column": edge.to_column},
                        "nullable": edge.nullable,
                    })
                })
                .collect();
            json!({
                "name": table.name(),
                "primary_key": table.primary_key(),
                "columns": table.columns(),
                "foreign_keys": edges,
            })
        })
        .collect();
    Value::Array(tables)
}

use clap::Parser;
use keisan::graph::{EditorGraph, EditorNode};
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;

/// A CLI tool to generate random acyclic editor graphs for keisan
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// The number of constant source nodes
    #[arg(long, default_value_t = 4)]
    sources: usize,

    /// The number of arithmetic nodes built on top of the sources
    #[arg(long, default_value_t = 20)]
    nodes: usize,
}

const BINARY_TYPES: [&str; 4] = ["add", "subtract", "multiply", "divide"];
const UNARY_TYPES: [&str; 3] = ["negate", "abs", "round"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.sources == 0 {
        eprintln!("Error: --sources must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating graph with {} source(s) and {} computed node(s)...",
        cli.sources, cli.nodes
    );

    let graph = generate_graph(&mut rng, cli.sources, cli.nodes);
    let json_output = serde_json::to_string_pretty(&graph)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved {} node(s) to '{}'",
        graph.nodes.len(),
        cli.output
    );

    Ok(())
}

/// Nodes only connect to ids generated before them, so the result is acyclic.
fn generate_graph(rng: &mut ThreadRng, sources: usize, computed: usize) -> EditorGraph {
    let mut nodes = BTreeMap::new();
    let mut ids = Vec::with_capacity(sources + computed);

    for i in 0..sources {
        let id = format!("src{:03}", i);
        let mut inputs = BTreeMap::new();
        inputs.insert("value".to_string(), json!(rng.random_range(-100.0..100.0)));
        nodes.insert(
            id.clone(),
            EditorNode {
                node_type: "constant".to_string(),
                inputs,
            },
        );
        ids.push(id);
    }

    for i in 0..computed {
        let id = format!("n{:03}", i);
        let mut inputs = BTreeMap::new();
        let node_type = if rng.random_bool(0.75) {
            inputs.insert("a".to_string(), random_input(rng, &ids));
            inputs.insert("b".to_string(), random_input(rng, &ids));
            BINARY_TYPES[rng.random_range(0..BINARY_TYPES.len())]
        } else {
            inputs.insert("value".to_string(), random_input(rng, &ids));
            UNARY_TYPES[rng.random_range(0..UNARY_TYPES.len())]
        };
        nodes.insert(
            id.clone(),
            EditorNode {
                node_type: node_type.to_string(),
                inputs,
            },
        );
        ids.push(id);
    }

    EditorGraph { nodes }
}

/// A connection to an earlier node most of the time, otherwise a literal.
fn random_input(rng: &mut ThreadRng, earlier: &[String]) -> serde_json::Value {
    if rng.random_bool(0.8) {
        let source = &earlier[rng.random_range(0..earlier.len())];
        json!({ "node": source })
    } else {
        json!(rng.random_range(1..10))
    }
}

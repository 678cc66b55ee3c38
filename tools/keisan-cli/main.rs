use clap::Parser;
use keisan::prelude::*;
use std::time::{Duration, Instant};

/// Validate and run node graphs exported by the editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor graph JSON file
    graph_path: Option<String>,

    /// Run a plan saved earlier with --save-plan instead of a graph file
    #[arg(long, conflicts_with = "graph_path")]
    plan: Option<String>,

    /// Save the validated plan to this path
    #[arg(long)]
    save_plan: Option<String>,

    /// Print the node palette of the standard catalog as JSON and exit
    #[arg(long)]
    palette: bool,

    /// Evaluate independent nodes in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Per-node timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let engine = Engine::standard();

    if cli.palette {
        print_json(&engine.catalog().palette().to_json());
        return;
    }

    let total_start = Instant::now();

    // --- 1. Loading and Planning ---
    let plan_start = Instant::now();
    let plan = match (&cli.plan, &cli.graph_path) {
        (Some(plan_path), _) => ExecutionPlan::from_file(plan_path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load plan '{}': {}", plan_path, e))
        }),
        (None, Some(graph_path)) => load_and_plan(&engine, graph_path),
        (None, None) => exit_with_error("A graph path or --plan is required."),
    };
    let plan_duration = plan_start.elapsed();

    if let Some(path) = &cli.save_plan {
        plan.save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save plan: {}", e)));
        println!("Saved plan to '{}'", path);
    }

    // --- 2. Execution ---
    let mut options = RunOptions::new();
    if cli.parallel {
        options = options.with_strategy(StrategyChoice::Parallel);
    }
    if let Some(ms) = cli.timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }

    let eval_start = Instant::now();
    let report = engine
        .execute(&plan, &options)
        .unwrap_or_else(|e| exit_with_error(&format!("Execution failed: {}", e)));
    let eval_duration = eval_start.elapsed();

    // --- 3. Results and Summary ---
    if cli.json {
        print_json(&report.to_json());
        return;
    }

    println!("\n{}", ReportFormatter::format_report(&report));

    println!("\n--- Performance Summary ---");
    println!("Planning:             {:?}", plan_duration);
    println!("Evaluation:           {:?}", eval_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!("Strategy Used:        {:?}", options.strategy);
    println!();
}

fn load_and_plan(engine: &Engine, graph_path: &str) -> ExecutionPlan {
    let graph = EditorGraph::from_file(graph_path)
        .and_then(IntoGraph::into_graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));

    match engine.plan(graph) {
        Ok(plan) => plan,
        Err(RunError::Invalid(errors)) => {
            eprintln!("\nThe graph is invalid ({} error(s)):", errors.len());
            for error in &errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => exit_with_error(&format!("Planning failed: {}", e)),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => exit_with_error(&format!("Failed to render JSON: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

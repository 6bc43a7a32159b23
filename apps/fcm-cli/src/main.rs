use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fcm_app::{AppConfig, AppResult, RunOptions, RunTimingSummary, analysis, query, run_service};
use fcm_project::schema::{GraphDef, SimulationRequest, SimulationResponse};

#[derive(Parser)]
#[command(name = "fcm-cli")]
#[command(about = "fcmflow CLI - Fuzzy cognitive map simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a simulation request document
    Validate {
        /// Path to the request file (JSON or YAML)
        request_path: PathBuf,
    },
    /// Run a simulation and write the response as JSON
    Simulate {
        /// Path to the request file (JSON or YAML)
        request_path: PathBuf,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file with parameter defaults (falls back to $FCM_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also run the baseline and report deltas
        #[arg(long)]
        baseline: bool,
    },
    /// Compute network metrics for a request or model document
    Analyze {
        /// Path to a document with `nodes` and `edges`
        path: PathBuf,
    },
    /// Export one node's time series from a response as CSV
    Series {
        /// Path to a response JSON file
        response_path: PathBuf,
        /// Node ID
        node_id: String,
        /// Read the baseline series instead of the primary one
        #[arg(long)]
        baseline: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a request and save it as a named scenario
    Scenario {
        /// Path to the request file (JSON or YAML)
        request_path: PathBuf,
        /// Scenario name
        #[arg(long)]
        name: String,
        /// ID of the model the scenario belongs to
        #[arg(long)]
        model_id: String,
        /// Config file with parameter defaults (falls back to $FCM_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { request_path } => cmd_validate(&request_path),
        Commands::Simulate {
            request_path,
            output,
            config,
            baseline,
        } => cmd_simulate(&request_path, output.as_deref(), config.as_deref(), baseline),
        Commands::Analyze { path } => cmd_analyze(&path),
        Commands::Series {
            response_path,
            node_id,
            baseline,
            output,
        } => cmd_series(&response_path, &node_id, baseline, output.as_deref()),
        Commands::Scenario {
            request_path,
            name,
            model_id,
            config,
            output,
        } => cmd_scenario(
            &request_path,
            &name,
            &model_id,
            config.as_deref(),
            output.as_deref(),
        ),
    }
}

fn cmd_validate(request_path: &Path) -> AppResult<()> {
    println!("Validating request: {}", request_path.display());
    let request = run_service::check_request_file(request_path)?;
    println!(
        "✓ Request is valid ({} nodes, {} edges)",
        request.nodes.len(),
        request.edges.len()
    );
    Ok(())
}

fn cmd_simulate(
    request_path: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    baseline: bool,
) -> AppResult<()> {
    let config = AppConfig::load(config_path)?;
    tracing::info!(request = %request_path.display(), "running simulation");
    let options = RunOptions {
        compare_to_baseline: baseline.then_some(true),
    };

    let run = run_service::run_request_file(request_path, &config, &options)?;
    write_json(&run.response, output)?;

    let summary = query::get_run_summary(&run.response);
    if summary.converged {
        eprintln!("✓ Converged after {} iterations", summary.iterations);
    } else {
        eprintln!(
            "✗ Did not converge within {} iterations",
            summary.iterations
        );
    }
    eprintln!("  Nodes: {}", summary.node_count);
    if let Some(iterations) = summary.baseline_iterations {
        eprintln!(
            "  Baseline: {} iterations (converged: {})",
            iterations,
            summary.baseline_converged.unwrap_or(false)
        );
    }
    if let Some((node, delta)) = &summary.largest_delta {
        eprintln!("  Largest delta: {} ({:+.6})", node, delta);
    }
    print_timing_summary(&run.timing);
    Ok(())
}

fn cmd_analyze(path: &Path) -> AppResult<()> {
    let graph: GraphDef = fcm_project::load_document(path)?;
    let metrics = analysis::analyze_documents(&graph.nodes, &graph.edges)?;
    write_json(&metrics, None)
}

fn cmd_series(
    response_path: &Path,
    node_id: &str,
    baseline: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let response: SimulationResponse = fcm_project::load_document(response_path)?;
    let series = query::extract_node_series(&response, node_id, baseline)?;
    let csv = query::series_to_csv(&series);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_scenario(
    request_path: &Path,
    name: &str,
    model_id: &str,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = AppConfig::load(config_path)?;
    let request: SimulationRequest = fcm_project::load_document(request_path)?;
    let scenario =
        fcm_app::create_scenario(name, model_id, request, &config, &RunOptions::default())?;

    match output {
        Some(path) => {
            fcm_project::save_scenario(path, &scenario)?;
            eprintln!("✓ Scenario {} saved to {}", scenario.id, path.display());
        }
        None => write_json(&scenario, None)?,
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_timing_summary(timing: &RunTimingSummary) {
    eprintln!("Timing:");
    eprintln!("  compile:   {:.3} ms", timing.compile_time_s * 1e3);
    eprintln!("  propagate: {:.3} ms", timing.propagate_time_s * 1e3);
    eprintln!("  total:     {:.3} ms", timing.total_time_s * 1e3);
}

//! Ironclad CLI: property extraction with provenance and comparison.
//!
//! Usage:
//!   ironclad run <layout.json> [--baseline file] [--out dir] [--config file]
//!   ironclad batch <layout.json>... [--baseline file] [--out dir] [--jobs n]
//!   ironclad normalize <value> <unit>

use clap::{Parser, Subcommand};
use ironclad::{
    load_baseline, BaselineEntry, BatchRunner, DocumentExport, DocumentPipeline, JsonSpanSource,
    PipelineConfig, SpanSource,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ironclad",
    version,
    about = "Proof-carrying extraction of material property claims"
)]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/ironclad/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one layout JSON document
    Run {
        /// Layout JSON produced by the span source
        input: PathBuf,
        /// External baseline (JSON, JSON-lines or CSV)
        #[arg(long)]
        baseline: Option<PathBuf>,
        /// Output directory for the JSON export and CSV projections
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Material used when a sentence names none
        #[arg(long)]
        material: Option<String>,
    },
    /// Process many layout JSON documents in parallel
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        baseline: Option<PathBuf>,
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Documents processed at the same time (overrides the config)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Show the SI conversion of a single value
    Normalize {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        unit: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    PipelineConfig::discover(path).map_err(|e| format!("Failed to load config: {}", e))
}

fn load_baseline_opt(path: Option<&Path>) -> Result<Vec<BaselineEntry>, String> {
    match path {
        Some(p) => load_baseline(p)
            .map_err(|e| format!("Failed to load baseline '{}': {}", p.display(), e)),
        None => Ok(Vec::new()),
    }
}

fn write_export(export: &DocumentExport, out: &Path) -> i32 {
    match export.write_outputs(out) {
        Ok(paths) => {
            let hard_fails = export.blocked_records().count();
            println!(
                "{}: {} records ({} hard_fail), {} comparison rows",
                export.doc_id,
                export.records.len(),
                hard_fails,
                export.comparison.len()
            );
            for path in paths {
                println!("  wrote {}", path.display());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: cannot write outputs for {}: {}", export.doc_id, e);
            1
        }
    }
}

async fn cmd_run(
    config: PipelineConfig,
    input: &Path,
    baseline: Option<&Path>,
    out: &Path,
    material: Option<String>,
) -> i32 {
    let config = match material {
        Some(m) => config.with_default_material(m),
        None => config,
    };
    let baseline = match load_baseline_opt(baseline) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let pipeline = DocumentPipeline::new(config).with_baseline(baseline);
    let source = JsonSpanSource::new(input);
    match pipeline.run_source(&source).await {
        Ok(export) => write_export(&export, out),
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            1
        }
    }
}

async fn cmd_batch(
    config: PipelineConfig,
    inputs: Vec<PathBuf>,
    baseline: Option<&Path>,
    out: &Path,
    jobs: Option<usize>,
) -> i32 {
    let config = match jobs {
        Some(n) => config.with_max_concurrent_documents(n),
        None => config,
    };
    let baseline = match load_baseline_opt(baseline) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let runner = BatchRunner::new(DocumentPipeline::new(config).with_baseline(baseline));
    let sources: Vec<Box<dyn SpanSource>> = inputs
        .into_iter()
        .map(|p| Box::new(JsonSpanSource::new(p)) as Box<dyn SpanSource>)
        .collect();

    let mut code = 0;
    for outcome in runner.run(sources).await {
        match &outcome.result {
            Ok(export) => {
                if write_export(export, out) != 0 {
                    code = 1;
                }
            }
            Err(e) => {
                eprintln!("Error: {}: {}", outcome.source_id, e);
                code = 1;
            }
        }
    }
    code
}

fn cmd_normalize(value: f64, unit: &str) -> i32 {
    if ironclad::units::is_non_convertible(unit) {
        eprintln!("'{}' is a recognized unit with no SI conversion", unit);
        return 1;
    }
    match ironclad::units::lookup(unit) {
        Some(trace) => {
            let si = ironclad::units::to_si(value, &trace);
            println!("{} {} = {} {}", value, unit, si, trace.to);
            println!("  dimension: {}", trace.dimension);
            println!("  factor:    {}", trace.factor);
            if trace.offset != 0.0 {
                println!("  offset:    {}", trace.offset);
            }
            0
        }
        None => {
            eprintln!("Error: {}: '{}'", ironclad::units::UNSUPPORTED_UNIT, unit);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Commands::Normalize { value, unit } = &cli.command {
        std::process::exit(cmd_normalize(*value, unit));
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Run {
            input,
            baseline,
            out,
            material,
        } => rt.block_on(cmd_run(config, &input, baseline.as_deref(), &out, material)),
        Commands::Batch {
            inputs,
            baseline,
            out,
            jobs,
        } => rt.block_on(cmd_batch(config, inputs, baseline.as_deref(), &out, jobs)),
        Commands::Normalize { .. } => 0,
    };
    std::process::exit(code);
}

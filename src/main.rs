use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aggexpr::{
    ConfigError, Document, EngineConfig, ExecutionError, Executor, OperatorRegistry, ParseContext,
    Pipeline, ProjectStage, Stage, Value,
};
use clap::Parser;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Evaluate aggregation expressions over a file of JSON documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// File holding a `$project` specification object
    #[arg(long, conflicts_with = "pipeline", required_unless_present = "pipeline")]
    stage: Option<PathBuf>,

    /// File holding a pipeline: an array of stage objects
    #[arg(long)]
    pipeline: Option<PathBuf>,

    /// File holding a JSON array of input documents
    #[arg(long)]
    docs: PathBuf,

    /// Engine configuration file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `aggexpr=trace`. RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' must contain an array of documents")]
    NotDocuments(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Execution(err)) => {
            let report = json!({"ok": 0, "code": err.code().code(), "errmsg": err.to_string()});
            println!("{}", report);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let registry = OperatorRegistry::default();
    let mut ctx = ParseContext::new(&registry).with_max_depth(config.max_expression_depth);

    // Compile before reading any documents.
    let pipeline = match (&cli.stage, &cli.pipeline) {
        (_, Some(path)) => Pipeline::parse(&read_json(path)?, &mut ctx)?,
        (Some(path), None) => Pipeline {
            stages: vec![Stage::Project(ProjectStage::parse(
                &read_json(path)?,
                &mut ctx,
            )?)],
        },
        (None, None) => Pipeline::default(),
    };

    let documents = read_documents(&cli.docs)?;
    info!(documents = documents.len(), stages = pipeline.stages.len(), "running pipeline");

    let executor = Executor::new(&registry, &config);
    for document in pipeline.run(&executor, &documents)? {
        println!("{}", Value::Document(document));
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read input file");
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn read_documents(path: &Path) -> Result<Vec<Document>, CliError> {
    let not_documents = || CliError::NotDocuments(path.display().to_string());
    let items = match read_json(path)? {
        serde_json::Value::Array(items) => items,
        _ => return Err(not_documents()),
    };

    items
        .into_iter()
        .map(|item| match Value::from(item) {
            Value::Document(doc) => Ok(doc),
            _ => Err(not_documents()),
        })
        .collect()
}

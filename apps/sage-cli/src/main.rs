use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sage_ops::{init_tracing, JsonFileStore};
use sage_pipeline::{DashboardPipeline, DashboardSession};
use sage_types::{config::SageConfig, raw::RawRow, records::RecordSchema};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "sage-cli", about = "Model-monitoring analytics over parsed telemetry rows")]
struct Cli {
    /// TOML configuration file. Falls back to $SAGE_CONFIG, then configs/dev.toml.
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a JSON array of rows, store it and print the dashboard.
    Analyze {
        #[arg(long, value_enum)]
        schema: SchemaArg,
        /// JSON file holding an array of header -> value objects.
        #[arg(long)]
        rows: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the dashboard for the stored dataset.
    Show {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Forget the stored dataset.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaArg {
    Vision,
    Batch,
    Llm,
}

impl From<SchemaArg> for RecordSchema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Vision => RecordSchema::Vision,
            SchemaArg::Batch => RecordSchema::Batch,
            SchemaArg::Llm => RecordSchema::Llm,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config);
    init_tracing(&config.ops)?;

    let store = JsonFileStore::new(&config.store.path);
    let mut session = DashboardSession::new(DashboardPipeline::new(&config), store);

    match cli.command {
        Command::Analyze {
            schema,
            rows,
            output,
        } => {
            let contents = fs::read_to_string(&rows)
                .with_context(|| format!("unable to read rows from {}", rows.display()))?;
            let parsed: Vec<RawRow> = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not a JSON array of rows", rows.display()))?;
            let dataset = session.ingest(schema.into(), &parsed)?;
            let dashboard = session.pipeline().analyze(&dataset);
            emit(&serde_json::to_string_pretty(&dashboard)?, output)?;
        }
        Command::Show { output } => match session.dashboard()? {
            Some(dashboard) => emit(&serde_json::to_string_pretty(&dashboard)?, output)?,
            None => warn!("No stored dataset at {}", config.store.path),
        },
        Command::Clear => {
            session.clear()?;
            info!("Cleared stored dataset at {}", config.store.path);
        }
    }
    Ok(())
}

fn emit(doc: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, doc)
                .with_context(|| format!("unable to write {}", path.display()))?;
            info!("Dashboard written to {:?}", path);
        }
        None => println!("{doc}"),
    }
    Ok(())
}

fn load_config(from_args: Option<PathBuf>) -> SageConfig {
    let from_env = env::var("SAGE_CONFIG").ok().map(PathBuf::from);
    let path = from_args
        .or(from_env)
        .unwrap_or_else(|| PathBuf::from("configs/dev.toml"));
    match SageConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!(
                    "Invalid config in '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                SageConfig::default()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                path.display()
            );
            SageConfig::default()
        }
    }
}

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sqlgremlin::{
    config, graph_catalog::config::GraphSchemaConfig, select_compiler, sql_ast::SqlSelect,
};

/// sqlgremlin - Compile SQL select trees into Gremlin traversals
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Graph schema (YAML) describing vertex and edge tables
    #[arg(long)]
    schema: PathBuf,

    /// Validated select tree (JSON) to compile
    #[arg(long)]
    query: PathBuf,

    /// Engine configuration (YAML); environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where WHERE filters go: before_grouping or after_having
    #[arg(long)]
    where_placement: Option<select_compiler::WherePlacement>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Groovy)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Gremlin-Groovy script and output columns
    Groovy,
    /// Traversal steps and output columns as JSON
    Json,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            where_placement: cli.where_placement,
        }
    }
}

fn load_config(cli: &Cli) -> Result<config::EngineConfig, config::ConfigError> {
    let base = match &cli.config {
        Some(path) => config::EngineConfig::from_yaml_file(path)?,
        None => config::EngineConfig::from_env()?,
    };
    config::EngineConfig::from_cli(base, cli.into())
}

fn run(cli: &Cli, engine: &config::EngineConfig) -> anyhow::Result<()> {
    let schema = GraphSchemaConfig::from_yaml_file(&cli.schema)?
        .to_graph_schema()
        .with_context(|| format!("invalid schema {}", cli.schema.display()))?;

    let query = fs::read_to_string(&cli.query)
        .with_context(|| format!("failed to read {}", cli.query.display()))?;
    let select: SqlSelect = serde_json::from_str(&query)
        .with_context(|| format!("{} is not a select tree", cli.query.display()))?;

    let compiled = select_compiler::compile(&select, Arc::new(schema), &engine.translator())?;

    match cli.format {
        OutputFormat::Groovy => {
            println!("{}", compiled.to_groovy());
            println!();
            for column in compiled.columns() {
                println!("{}\t{}", column.name, column.ty);
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "traversal": compiled.traversal(),
                "columns": compiled.columns(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let engine = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &engine) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

//! Scaffold CLI - generate query artifacts from a dbt manifest
//!
//! Usage:
//!   scaffold generate <manifest.json> [--config <file>] [--dialect <dialect>] [--output <file>]
//!   scaffold entities <manifest.json> [--config <file>]
//!
//! Examples:
//!   scaffold generate target/manifest.json --dialect postgres --output artifacts.json
//!   scaffold entities target/manifest.json
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use clap::{Parser, Subcommand, ValueEnum};
use scaffold::config::Settings;
use scaffold::pipeline::Pipeline;
use scaffold::sql::Dialect;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Scaffold - generate parameterized query artifacts from a model graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts, resources and smoke tests as JSON
    Generate {
        /// Path to the dbt manifest.json
        manifest: PathBuf,

        /// Settings file (defaults to SCAFFOLD_CONFIG, then ./scaffold.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQL dialect to generate (overrides the settings file)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Write the bundle here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List entities, column roles and relationships
    Entities {
        /// Path to the dbt manifest.json
        manifest: PathBuf,

        /// Settings file (defaults to SCAFFOLD_CONFIG, then ./scaffold.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Duckdb,
    Postgres,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Postgres => Dialect::Postgres,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            manifest,
            config,
            dialect,
            output,
        } => cmd_generate(manifest, config, dialect, output),
        Commands::Entities { manifest, config } => cmd_entities(manifest, config),
    }
}

fn load_settings(config: Option<&Path>) -> Option<Settings> {
    let result = match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    match result {
        Ok(settings) => Some(settings),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            None
        }
    }
}

fn cmd_generate(
    manifest: PathBuf,
    config: Option<PathBuf>,
    dialect: Option<DialectArg>,
    output: Option<PathBuf>,
) -> ExitCode {
    let Some(mut settings) = load_settings(config.as_deref()) else {
        return ExitCode::FAILURE;
    };
    if let Some(dialect) = dialect {
        settings.generation.dialect = dialect.into();
    }

    let bundle = match Pipeline::new(settings).run_manifest(&manifest) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("Generation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&bundle) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing bundle: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, json) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            eprintln!(
                "Wrote {} artifacts, {} resources, {} tests to {}",
                bundle.artifacts.len(),
                bundle.resources.len(),
                bundle.tests.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    ExitCode::SUCCESS
}

fn cmd_entities(manifest: PathBuf, config: Option<PathBuf>) -> ExitCode {
    let Some(settings) = load_settings(config.as_deref()) else {
        return ExitCode::FAILURE;
    };
    let pipeline = Pipeline::new(settings);

    let graph = match scaffold::model::load_manifest(&manifest, &pipeline.settings().loader) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error loading '{}': {}", manifest.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let entities = match pipeline.entities(&graph) {
        Ok(entities) => entities,
        Err(e) => {
            eprintln!("Semantic error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Manifest: {}", manifest.display());
    println!();
    if entities.is_empty() {
        println!("No entities found.");
        return ExitCode::SUCCESS;
    }

    for entity in &entities {
        println!("{} (table: {}, key: {})", entity.name, entity.table, entity.primary_key);
        for column in &entity.columns {
            println!("  - {} [{}] {}", column.name, column.data_type, column.role);
        }
        if !entity.relationships.is_empty() {
            println!("  Relationships:");
            for (key, rel) in &entity.relationships {
                let keys: Vec<String> = rel
                    .join_keys
                    .iter()
                    .map(|k| format!("{} = {}.{}", k.from, rel.to_entity, k.to))
                    .collect();
                println!("    - {} ({}, {})", key, rel.cardinality, keys.join(", "));
            }
        }
        println!();
    }

    ExitCode::SUCCESS
}

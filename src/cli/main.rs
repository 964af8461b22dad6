//! winenote command-line front end

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use winenote::{AppConfig, FileSystemStorageBackend, RecordStore};

use commands::add::AddArgs;
use commands::export::ExportArgs;
use commands::import::ImportArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "winenote", version, about = "Wine-tasting notes with ZIP export and import")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overrides the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a tasting note
    Add(AddArgs),
    /// List all tasting notes
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all notes and photos into a ZIP bundle
    Export(ExportArgs),
    /// Import notes from a ZIP bundle or a JSON file
    Import(ImportArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    config.data_dir = config
        .data_dir
        .canonicalize()
        .with_context(|| format!("resolving data directory {}", config.data_dir.display()))?;
    Ok(config)
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), CliError> {
    let storage = FileSystemStorageBackend::new(&config.data_dir);
    let mut store = RecordStore::open(storage, config.records_file.clone()).await?;

    match cli.command {
        Commands::Add(args) => commands::add::handle_add(&mut store, &config, args).await,
        Commands::List { json } => commands::list::handle_list(&store, json),
        Commands::Export(args) => commands::export::handle_export(&store, config, &args).await,
        Commands::Import(args) => {
            commands::import::handle_import(&mut store, config, &args).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    if let Err(e) = run(cli, config).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

mod app_config;
mod sync;
mod watcher;

use app_config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use confstate::{document, SqliteStore};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use watcher::{ChangeKind, FileWatcher};

/// confstate CLI: keep a device config document in sync with its persisted state
#[derive(Parser)]
#[command(name = "confstate", version, about)]
struct Cli {
    /// Path to the SQLite state database
    #[arg(long, default_value = "confstate.db")]
    db: PathBuf,

    /// Namespace the config is persisted under
    #[arg(long, default_value = "config")]
    namespace: String,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a JSON document to the persisted config
    Import {
        /// Document file
        file: PathBuf,
    },

    /// Write the persisted config as a JSON document
    Export {
        /// Destination file (prints to stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the persisted config
    Show,

    /// Erase all persisted values in the namespace
    Reset,

    /// List the raw store entries
    Dump,

    /// Import a document file now and again every time it changes
    Watch {
        /// Document file
        file: PathBuf,
        /// Debounce interval in milliseconds
        #[arg(long, default_value_t = 200)]
        debounce_ms: u64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema = AppConfig::schema()?;
    let mut store = SqliteStore::open(&cli.db, &cli.namespace)?;

    match cli.command {
        Command::Import { file } => {
            let changed = sync::import(&schema, &mut store, &file)?;
            print_output(&serde_json::json!({ "ok": true, "changed": changed }), &cli.format)?;
        }

        Command::Export { out } => {
            let doc = sync::export(&schema, &store)?;
            match out {
                Some(path) => {
                    document::write_document(&path, &doc)?;
                    log::info!("Exported to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&doc)?),
            }
        }

        Command::Show => {
            let doc = sync::export(&schema, &store)?;
            print_output(&doc, &cli.format)?;
        }

        Command::Reset => {
            sync::reset(&mut store)?;
            print_output(&serde_json::json!({ "ok": true, "namespace": cli.namespace }), &cli.format)?;
        }

        Command::Dump => {
            let entries = sync::dump(&store)?;
            print_output(&entries, &cli.format)?;
        }

        Command::Watch { file, debounce_ms } => {
            sync::import(&schema, &mut store, &file)?;

            let watcher = FileWatcher::start(&file, Duration::from_millis(debounce_ms))?;
            log::info!("Watching {}", file.display());

            for change in watcher.event_rx.iter() {
                match change {
                    ChangeKind::Modified => match sync::import(&schema, &mut store, &file) {
                        Ok(true) => println!("applied {}", file.display()),
                        Ok(false) => {}
                        // A half-written file is retried on the next event
                        Err(e) => log::warn!("Failed to import {}: {e}", file.display()),
                    },
                    ChangeKind::Deleted => {
                        log::warn!("{} was removed, keeping persisted config", file.display());
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

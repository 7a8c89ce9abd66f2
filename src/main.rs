use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use radiot_search::{ingest, Database, OrderBy, SearchError, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(name = "radiot-search", version, about = "Full-text search over Radio-T transcripts")]
struct Cli {
    /// Path to the SQLite index
    #[arg(long, default_value = "data/radiot.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a transcript export into the index
    Ingest {
        /// Tab-separated export with a [filename, start_ms, end_ms, text] header
        #[arg(long)]
        file: PathBuf,
    },
    /// Run a full-text query
    Search {
        query: String,
        /// Restrict results to one episode
        #[arg(long)]
        episode: Option<u32>,
        #[arg(long, default_value = "rank_asc")]
        order_by: OrderBy,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Print index statistics
    Stats,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(parent) = cli.db.parent() {
        fs::create_dir_all(parent).ok();
    }
    // One shared read handle for the process lifetime.
    let db = Database::open(&cli.db)
        .with_context(|| format!("opening index at {}", cli.db.display()))?;

    match cli.command {
        Command::Ingest { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let fragments = ingest::parse_export(&raw)
                .with_context(|| format!("parsing {}", file.display()))?;
            let count = db.insert_fragments(&fragments)?;
            log::info!("ingested {} fragments from {}", count, file.display());
            println!("{count}");
        }
        Command::Search {
            query,
            episode,
            order_by,
            limit,
        } => match db.search(&query, episode, order_by, limit) {
            Ok(results) => println!("{}", serde_json::to_string_pretty(&results)?),
            // User-correctable, the CLI analogue of the 4xx path.
            Err(SearchError::QuerySyntax(message)) => {
                eprintln!("invalid query: {message}");
                return Ok(ExitCode::from(2));
            }
            Err(e) => return Err(e.into()),
        },
        Command::Stats => {
            println!("{}", serde_json::to_string(&db.stats()?)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use online_theater::application::service::TheaterService;
use online_theater::domain::ports::{CustomerStoreBox, MovieStoreBox};
use online_theater::infrastructure::in_memory::{InMemoryCustomerStore, InMemoryMovieStore};
use online_theater::interfaces::csv::command_reader::CommandReader;
use online_theater::interfaces::csv::customer_writer::CustomerWriter;
use online_theater::interfaces::csv::movie_reader::MovieReader;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Movie catalog CSV file (id, name, licensing_model)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "THEATER_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Instant used to report effective customer status (RFC 3339). Defaults to now.
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "THEATER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(CustomerStoreBox, MovieStoreBox)> {
    use online_theater::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        info!(path = %db_path.display(), "using RocksDB storage");
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(CustomerStoreBox, MovieStoreBox)> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> (CustomerStoreBox, MovieStoreBox) {
    (
        Box::new(InMemoryCustomerStore::new()),
        Box::new(InMemoryMovieStore::new()),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let (customer_store, movie_store) = open_stores(cli.db_path)?;
    let service = TheaterService::new(customer_store, movie_store);

    if let Some(catalog) = cli.catalog {
        let file = File::open(catalog).into_diagnostic()?;
        for movie in MovieReader::new(file).movies() {
            match movie {
                Ok(movie) => service.add_movie(movie).await.into_diagnostic()?,
                Err(e) => warn!(error = %e, "Error reading movie"),
            }
        }
    }

    let file = File::open(cli.input).into_diagnostic()?;
    let (mut applied, mut failed) = (0usize, 0usize);
    for command in CommandReader::new(file).commands() {
        match command {
            Ok(command) => {
                let (kind, customer) = (command.command, command.customer);
                match service.process_command(command).await {
                    Ok(()) => applied += 1,
                    Err(e) => {
                        failed += 1;
                        warn!(command = ?kind, customer, error = %e, "Error processing command");
                    }
                }
            }
            Err(e) => {
                failed += 1;
                warn!(error = %e, "Error reading command");
            }
        }
    }
    info!(applied, failed, "commands processed");

    let movies = service.movies().await.into_diagnostic()?;
    let customers = service.into_results().await.into_diagnostic()?;

    let as_of = cli.as_of.unwrap_or_else(Utc::now);
    let stdout = io::stdout();
    let writer = CustomerWriter::new(stdout.lock(), as_of).with_movies(&movies);
    match cli.format {
        OutputFormat::Csv => writer.write_csv(&customers),
        OutputFormat::Json => writer.write_json(&customers),
    }
    .into_diagnostic()?;

    Ok(())
}

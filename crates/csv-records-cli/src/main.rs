//! # csv-records-cli
//!
//! Command-line front end for `csv-records`.
//!
//! Converts CSV files to JSON arrays of records and back, using the header row
//! (or an explicit column list) to name the fields.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use csv_records::{CsvConfig, HeaderedReader, HeaderedWriter, Record};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvrec")]
#[command(about = "Read and write CSV files as named records")]
#[command(version)]
struct Cli {
    /// Path to a YAML file with CSV settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Field delimiter (overrides the configuration file)
    #[arg(short, long, global = true)]
    delimiter: Option<char>,

    /// Terminate written rows with CRLF
    #[arg(long, global = true)]
    crlf: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header columns of a CSV file, one per line
    Headers {
        /// Input file path, `-` for stdin
        input: PathBuf,
    },

    /// Print the records of a CSV file as a JSON array
    Read {
        /// Input file path, `-` for stdin
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Write a JSON array of records as CSV
    Write {
        /// JSON input file path, `-` for stdin
        input: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Header columns, in output order
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Headers { input } => {
            tracing::info!("Reading header of {}", input.display());
            headers(&input, &config)
        }
        Commands::Read { input, pretty } => {
            tracing::info!("Reading records from {}", input.display());
            read(&input, &config, pretty)
        }
        Commands::Write {
            input,
            output,
            columns,
        } => {
            tracing::info!("Writing records from {} with columns {:?}", input.display(), columns);
            write(&input, output.as_deref(), columns, &config)
        }
    }
}

fn load_config(cli: &Cli) -> Result<CsvConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => CsvConfig::default(),
    };

    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if cli.crlf {
        config = config.use_crlf(true);
    }
    config.validate()?;
    tracing::debug!(?config, "Resolved CSV configuration");
    Ok(config)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

fn headers(input: &Path, config: &CsvConfig) -> Result<()> {
    let mut reader = HeaderedReader::with_config(open_input(input)?, config)?;
    let Some(columns) = reader.read_header()? else {
        tracing::warn!("{} has no header row", input.display());
        return Ok(());
    };

    let mut stdout = io::stdout().lock();
    for column in columns {
        writeln!(stdout, "{column}")?;
    }
    Ok(())
}

fn read(input: &Path, config: &CsvConfig, pretty: bool) -> Result<()> {
    let mut reader = HeaderedReader::with_config(open_input(input)?, config)?;
    let records = reader
        .read_all()
        .with_context(|| format!("failed to read {}", input.display()))?;

    // Sorted keys keep the output stable between runs.
    let sorted: Vec<BTreeMap<&str, &str>> = records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect()
        })
        .collect();

    let json = if pretty {
        serde_json::to_string_pretty(&sorted)?
    } else {
        serde_json::to_string(&sorted)?
    };
    println!("{json}");
    Ok(())
}

fn write(
    input: &Path,
    output: Option<&Path>,
    columns: Vec<String>,
    config: &CsvConfig,
) -> Result<()> {
    let mut text = String::new();
    open_input(input)?
        .read_to_string(&mut text)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of string maps", input.display()))?;

    match output {
        Some(path) => {
            let mut writer = HeaderedWriter::from_path(path, columns, config)
                .with_context(|| format!("failed to create {}", path.display()))?;
            writer
                .write_all(&records)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let mut writer = HeaderedWriter::with_config(io::stdout().lock(), columns, config)?;
            writer.write_all(&records).context("failed to write stdout")?;
        }
    }
    tracing::info!("Wrote {} records", records.len());
    Ok(())
}

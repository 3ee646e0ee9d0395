//! flatiron-prepare: Build the tables the visualization layer consumes
//!
//! The lenient path: records missing a usable latitude, longitude, suburb,
//! or price are dropped (and reported) instead of failing the run. Writes
//! the normalized listings table and the per-suburb summary table as JSON
//! arrays; the presentation layer handles filtering widgets and charts.
//!
//! Usage:
//!   # Write listings.json and suburbs.json into ./prepared
//!   flatiron-prepare listings.json --out-dir prepared
//!
//!   # Also keep a CSV copy of the listings table
//!   flatiron-prepare listings.json --out-dir prepared --csv
//!
//!   # Read newline-delimited input from stdin
//!   cat listings.jsonl | flatiron-prepare --ndjson --out-dir prepared

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatiron::aggregate::aggregate_by_location;
use flatiron::load::load_records;
use flatiron::normalize::{writer, ListingNormalizer, NormalizeConfig};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flatiron-prepare")]
#[command(about = "Build normalized and aggregated listing tables", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Directory for listings.json and suburbs.json
    #[arg(long, short = 'o')]
    out_dir: PathBuf,

    /// Process newline-delimited JSON (one record per line)
    #[arg(long)]
    ndjson: bool,

    /// Additionally write listings.csv
    #[arg(long)]
    csv: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {file_path}"))?,
        ))
    } else {
        Box::new(std::io::stdin())
    };

    let records = load_records(reader, args.ndjson)?;
    let normalizer = ListingNormalizer::new(NormalizeConfig::filtered());
    let outcome = normalizer.normalize_all(&records)?;
    let summaries = aggregate_by_location(&outcome.listings);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let listings_path = args.out_dir.join("listings.json");
    let file = File::create(&listings_path)
        .with_context(|| format!("Failed to create {}", listings_path.display()))?;
    writer::write_json(BufWriter::new(file), &outcome.listings)?;

    let suburbs_path = args.out_dir.join("suburbs.json");
    let file = File::create(&suburbs_path)
        .with_context(|| format!("Failed to create {}", suburbs_path.display()))?;
    writer::write_json(BufWriter::new(file), &summaries)?;

    if args.csv {
        let csv_path = args.out_dir.join("listings.csv");
        let file = File::create(&csv_path)
            .with_context(|| format!("Failed to create {}", csv_path.display()))?;
        writer::write_csv(BufWriter::new(file), &outcome.listings)?;
    }

    println!(
        "Prepared {} of {} rows ({} dropped), {} suburb groups -> {}",
        outcome.rows_kept(),
        outcome.rows_read,
        outcome.dropped.len(),
        summaries.len(),
        args.out_dir.display()
    );

    Ok(())
}

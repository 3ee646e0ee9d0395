//! flatiron-clean: Flatten raw listing documents into a clean CSV table
//!
//! The batch-cleaning path: strict about required address fields, no row
//! filtering. Every record must carry a usable location and country code
//! or the run aborts.
//!
//! Usage:
//!   # Read from file, write CSV next to it
//!   flatiron-clean listings.json --output listings_cleaned.csv
//!
//!   # Read from stdin, CSV to stdout
//!   cat listings.json | flatiron-clean
//!
//!   # Process newline-delimited input
//!   flatiron-clean --ndjson listings.jsonl -o cleaned.csv

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatiron::load::load_records;
use flatiron::normalize::{writer, ListingNormalizer, NormalizeConfig};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};

#[derive(Parser, Debug)]
#[command(name = "flatiron-clean")]
#[command(about = "Flatten raw listing documents into a clean CSV table", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output CSV path (use stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Process newline-delimited JSON (one record per line)
    #[arg(long)]
    ndjson: bool,
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
    let normalizer = ListingNormalizer::new(NormalizeConfig::strict());
    let outcome = normalizer.normalize_all(&records)?;

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
        writer::write_csv(BufWriter::new(file), &outcome.listings)?;
        println!("Cleaned {} rows -> {path}", outcome.rows_kept());
    } else {
        writer::write_csv(std::io::stdout(), &outcome.listings)?;
    }

    Ok(())
}

use crate::normalize::types::Listing;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{Read, Write};

/// Write listings as delimited text: a header row with the fixed field
/// names, then one row per listing. Null fields become empty cells.
pub fn write_csv<W: Write>(writer: W, listings: &[Listing]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for listing in listings {
        out.serialize(listing)
            .context("Failed to serialize listing row")?;
    }
    out.flush().context("Failed to flush table writer")?;
    Ok(())
}

/// Read a table produced by [`write_csv`] back into listings.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Listing>> {
    let mut input = csv::Reader::from_reader(reader);
    let mut listings = Vec::new();
    for row in input.deserialize() {
        listings.push(row.context("Failed to parse listing row")?);
    }
    Ok(listings)
}

/// Serialize rows as a pretty-printed JSON array for the presentation layer.
pub fn write_json<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows).context("Failed to serialize table")
}

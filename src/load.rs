//! Input loading: whole-buffer SIMD parse with a serde_json fallback.
//!
//! The common case is a single top-level JSON array of listing documents.
//! simd-json handles that fast path; newline-delimited input, or anything
//! simd-json rejects, falls back to line-wise serde_json parsing.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;

/// Read raw records from `reader`.
///
/// A top-level array yields one record per element; any other top-level
/// value is treated as a single record. Pass `ndjson = true` to skip the
/// array attempt and parse one record per line.
pub fn load_records<R: Read>(mut reader: R, ndjson: bool) -> Result<Vec<Value>> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if ndjson {
        return parse_lines(&content);
    }

    // simd-json mutates its buffer while parsing, so give it a scratch copy
    // and keep the original for the fallback path.
    let mut scratch = content.clone();
    match simd_json::to_owned_value(&mut scratch) {
        Ok(simd_json::OwnedValue::Array(arr)) => {
            let mut records = Vec::with_capacity(arr.len());
            for elem in arr {
                records.push(convert(&elem)?);
            }
            Ok(records)
        }
        Ok(elem) => Ok(vec![convert(&elem)?]),
        Err(_) => parse_lines(&content),
    }
}

/// Bridge a simd-json value into serde_json's `Value`.
fn convert(elem: &simd_json::OwnedValue) -> Result<Value> {
    let json_str = simd_json::to_string(elem).context("Failed to re-serialize record")?;
    serde_json::from_str(&json_str).context("Failed to convert record")
}

fn parse_lines(content: &[u8]) -> Result<Vec<Value>> {
    let text = String::from_utf8_lossy(content);
    let mut records = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(serde_json::from_str(line).context("Failed to parse JSON record")?);
    }
    Ok(records)
}

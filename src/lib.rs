//! # Flatiron - Listings Normalization Toolkit
//!
//! A library for flattening semi-structured real-estate listing documents
//! (nested address blocks, MongoDB-extended-JSON numeric wrappers) into a
//! typed tabular form, plus per-suburb aggregation of the result.
//!
//! ## Modules
//!
//! - **normalize**: Extract raw listing documents into flat, typed rows
//! - **aggregate**: Reduce normalized rows to one summary per suburb
//! - **load**: Read a JSON array or NDJSON stream of raw records
//!
//! ## Quick Start
//!
//! ### Normalizing
//!
//! ```rust
//! use flatiron::normalize::{ListingNormalizer, NormalizeConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = vec![json!({
//!     "name": "Harbour Loft",
//!     "address": {
//!         "country_code": "AU",
//!         "suburb": "Manly",
//!         "location": {"coordinates": [151.28, -33.79]}
//!     },
//!     "price": {"$numberDouble": "210.0"},
//!     "number_of_reviews": 12
//! })];
//!
//! let normalizer = ListingNormalizer::new(NormalizeConfig::default());
//! let outcome = normalizer.normalize_all(&records)?;
//!
//! assert_eq!(outcome.listings[0].latitude, Some(-33.79));
//! assert_eq!(outcome.listings[0].price, Some(210.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### Aggregating
//!
//! ```rust
//! use flatiron::aggregate::aggregate_by_location;
//! use flatiron::normalize::{ListingNormalizer, NormalizeConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = vec![
//!     json!({"address": {"country_code": "AU", "suburb": "Manly",
//!            "location": {"coordinates": [151.28, -33.79]}}, "price": 100.0}),
//!     json!({"address": {"country_code": "AU", "suburb": "Manly",
//!            "location": {"coordinates": [151.29, -33.80]}}, "price": 300.0}),
//! ];
//!
//! let normalizer = ListingNormalizer::new(NormalizeConfig::filtered());
//! let outcome = normalizer.normalize_all(&records)?;
//! let summaries = aggregate_by_location(&outcome.listings);
//!
//! assert_eq!(summaries[0].price, Some(200.0));
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::io::Read;

pub mod aggregate;
pub mod error;
pub mod load;
pub mod normalize;

// Re-export commonly used types for convenience
pub use aggregate::{aggregate_by_location, SuburbSummary};
pub use error::NormalizeError;
pub use load::load_records;
pub use normalize::{
    FieldMode, Listing, ListingNormalizer, NormalizeConfig, NormalizeOutcome, RowDrop,
};

/// Main entry point: read raw records from a stream and normalize them.
pub fn normalize_stream<R: Read>(reader: R, config: NormalizeConfig) -> Result<NormalizeOutcome> {
    let records = load::load_records(reader, false)?;
    let normalizer = ListingNormalizer::new(config);
    Ok(normalizer.normalize_all(&records)?)
}

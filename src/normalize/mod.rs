//! Listing normalization - flatten raw listing documents into typed rows.
//!
//! This module turns the heterogeneous source shape (nested address block,
//! extended-JSON numeric wrappers, optional everything) into the fixed
//! [`Listing`] row the aggregator and the table writer consume.

pub mod extractor;
pub mod raw;
pub mod types;
pub mod writer;

pub use extractor::{derive_amenities_count, derive_month, derive_rating, ListingNormalizer};
pub use raw::{ExtNumber, RawAddress, RawListing, RawLocation};
pub use types::{FieldMode, Listing, NormalizeConfig, NormalizeOutcome, RowDrop, UNKNOWN};
pub use writer::{read_csv, write_csv, write_json};

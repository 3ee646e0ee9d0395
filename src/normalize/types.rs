use serde::{Deserialize, Serialize};

/// Named default for absent categorical fields.
pub const UNKNOWN: &str = "Unknown";

/// A fully normalized listing - one row in the flat table.
///
/// Field order here is the column order of the written table. Missing
/// numeric fields are `None` (an empty cell); missing categorical fields
/// carry the literal [`UNKNOWN`] sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub name: String,
    pub price: Option<f64>,
    pub property_type: String,
    /// Calendar month (1-12) of the `last_scraped` stamp.
    pub month: Option<u32>,
    pub country_code: Option<String>,
    pub suburb: Option<String>,
    /// Coarse 5-10 quality score derived from the review count.
    pub rating: u8,
    pub city: String,
    pub availability: Option<f64>,
    pub minimum_nights: Option<f64>,
    pub maximum_nights: Option<f64>,
    pub room_type: String,
    pub bedrooms: Option<f64>,
    pub beds: Option<i64>,
    pub bathrooms: Option<f64>,
    pub amenities_count: u64,
    pub number_of_reviews: i64,
}

impl Listing {
    /// True when latitude, longitude, suburb, and price are all present -
    /// the four fields the completeness filter guards.
    pub fn is_complete(&self) -> bool {
        self.latitude.is_some()
            && self.longitude.is_some()
            && self.suburb.is_some()
            && self.price.is_some()
    }
}

/// How the normalizer treats required nested paths that are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// Absent paths become nulls; unusable records are dropped and reported.
    #[default]
    Lenient,
    /// Absent paths abort the whole run with a [`crate::NormalizeError`].
    Strict,
}

/// Configuration for a normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizeConfig {
    pub mode: FieldMode,

    /// Remove rows whose latitude, longitude, suburb, or price is null.
    pub filter_incomplete: bool,
}

impl NormalizeConfig {
    /// Lenient extraction plus the completeness filter - the shape the
    /// presentation layer expects.
    pub fn filtered() -> Self {
        NormalizeConfig {
            mode: FieldMode::Lenient,
            filter_incomplete: true,
        }
    }

    /// Strict extraction, no filter - the batch-cleaning shape.
    pub fn strict() -> Self {
        NormalizeConfig {
            mode: FieldMode::Strict,
            filter_incomplete: false,
        }
    }
}

/// Why a record was removed during a lenient pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDrop {
    /// Position of the record in the input sequence.
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing a batch: the surviving rows plus an account of
/// what was read and what was dropped.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub listings: Vec<Listing>,
    pub rows_read: usize,
    pub dropped: Vec<RowDrop>,
}

impl NormalizeOutcome {
    pub fn rows_kept(&self) -> usize {
        self.listings.len()
    }
}

//! Per-suburb aggregation of normalized listings.
//!
//! Groups rows by the exact (suburb, country_code) pair and reduces each
//! group to one summary row. Means skip null values; coordinates are the
//! first seen in the group rather than an average, so the summary point
//! stays inside the suburb.

use crate::normalize::types::Listing;
use serde::Serialize;
use std::collections::HashMap;

/// One summary row per (suburb, country_code) pair, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuburbSummary {
    pub suburb: String,
    pub country_code: String,
    /// Mean over non-null prices in the group.
    pub price: Option<f64>,
    /// Mean rating in the group.
    pub rating: Option<f64>,
    /// Mean bed count, rounded to a whole number.
    pub beds: Option<i64>,
    /// Mean bathroom count, rounded to a whole number.
    pub bathrooms: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Running mean that ignores null values.
#[derive(Debug, Default)]
struct MeanAccum {
    sum: f64,
    count: usize,
}

impl MeanAccum {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// `None` when the group had no non-null values, never a division by zero.
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct GroupAccum {
    price: MeanAccum,
    rating: MeanAccum,
    beds: MeanAccum,
    bathrooms: MeanAccum,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Group listings by (suburb, country_code) and compute one summary per group.
///
/// Key comparison is an exact string match. Rows missing either key field
/// never form a group. Empty input produces empty output.
pub fn aggregate_by_location(listings: &[Listing]) -> Vec<SuburbSummary> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), GroupAccum> = HashMap::new();

    for listing in listings {
        let (Some(suburb), Some(country)) =
            (listing.suburb.as_ref(), listing.country_code.as_ref())
        else {
            continue;
        };

        let key = (suburb.clone(), country.clone());
        let accum = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            GroupAccum::default()
        });

        accum.price.push(listing.price);
        accum.rating.push(Some(f64::from(listing.rating)));
        accum.beds.push(listing.beds.map(|b| b as f64));
        accum.bathrooms.push(listing.bathrooms);
        if accum.latitude.is_none() {
            accum.latitude = listing.latitude;
        }
        if accum.longitude.is_none() {
            accum.longitude = listing.longitude;
        }
    }

    let mut summaries = Vec::with_capacity(order.len());
    for key in order {
        if let Some(accum) = groups.remove(&key) {
            summaries.push(SuburbSummary {
                suburb: key.0,
                country_code: key.1,
                price: accum.price.mean(),
                rating: accum.rating.mean(),
                beds: accum.beds.mean().map(round_to_count),
                bathrooms: accum.bathrooms.mean().map(round_to_count),
                latitude: accum.latitude,
                longitude: accum.longitude,
            });
        }
    }
    summaries
}

/// Mean bed/bathroom counts come out fractional; report a whole number.
/// Ties round half-away-from-zero.
fn round_to_count(mean: f64) -> i64 {
    mean.round() as i64
}

//! The record-to-record normalization pass.
//!
//! One raw listing document goes in, one typed [`Listing`] row comes out.
//! The pass is composed of named field extractors so each contract
//! (coordinate order, rating buckets, month derivation) is testable on
//! its own.

use crate::error::NormalizeError;
use crate::normalize::raw::{ExtNumber, RawAddress, RawListing};
use crate::normalize::types::{
    FieldMode, Listing, NormalizeConfig, NormalizeOutcome, RowDrop, UNKNOWN,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

/// Normalizes raw listing documents into flat [`Listing`] rows.
pub struct ListingNormalizer {
    config: NormalizeConfig,
}

impl ListingNormalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        ListingNormalizer { config }
    }

    /// Normalize a batch of raw records.
    ///
    /// In lenient mode, records that cannot be normalized are dropped and
    /// reported in the outcome; in strict mode the first failure aborts.
    /// When the config requests it, rows missing latitude, longitude,
    /// suburb, or price are filtered out afterwards.
    pub fn normalize_all(&self, records: &[Value]) -> Result<NormalizeOutcome, NormalizeError> {
        let mut listings = Vec::with_capacity(records.len());
        let mut dropped = Vec::new();

        for (index, value) in records.iter().enumerate() {
            let listing = match self.normalize_one(index, value) {
                Ok(listing) => listing,
                Err(err) => match self.config.mode {
                    FieldMode::Strict => return Err(err),
                    FieldMode::Lenient => {
                        warn!(index, reason = %err, "dropping record");
                        dropped.push(RowDrop {
                            index,
                            reason: err.to_string(),
                        });
                        continue;
                    }
                },
            };

            if self.config.filter_incomplete && !listing.is_complete() {
                dropped.push(RowDrop {
                    index,
                    reason: String::from(
                        "incomplete row: latitude, longitude, suburb, or price is null",
                    ),
                });
                continue;
            }

            listings.push(listing);
        }

        Ok(NormalizeOutcome {
            listings,
            rows_read: records.len(),
            dropped,
        })
    }

    /// Normalize a single raw record.
    pub fn normalize_one(&self, index: usize, value: &Value) -> Result<Listing, NormalizeError> {
        let raw: RawListing = serde_json::from_value(value.clone()).map_err(|err| {
            NormalizeError::UnreadableRecord {
                index,
                detail: err.to_string(),
            }
        })?;

        let address = raw.address.as_ref();
        if address.is_none() && self.config.mode == FieldMode::Strict {
            return Err(NormalizeError::MissingField {
                index,
                field: "address",
            });
        }

        let (latitude, longitude) = self.extract_coordinates(index, address)?;
        let country_code = address.and_then(|a| a.country_code.clone());
        if country_code.is_none() && self.config.mode == FieldMode::Strict {
            return Err(NormalizeError::MissingField {
                index,
                field: "address.country_code",
            });
        }

        let number_of_reviews = raw
            .number_of_reviews
            .as_ref()
            .and_then(ExtNumber::as_i64)
            .unwrap_or(0);

        Ok(Listing {
            latitude,
            longitude,
            name: raw.name.unwrap_or_else(|| UNKNOWN.to_string()),
            price: raw.price.as_ref().and_then(ExtNumber::as_f64),
            property_type: raw.property_type.unwrap_or_else(|| UNKNOWN.to_string()),
            month: raw.last_scraped.as_ref().and_then(derive_month),
            country_code,
            suburb: address.and_then(|a| a.suburb.clone()),
            rating: derive_rating(number_of_reviews),
            city: address
                .and_then(|a| a.city.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            availability: raw.availability_30.as_ref().and_then(ExtNumber::as_f64),
            minimum_nights: raw.minimum_nights.as_ref().and_then(ExtNumber::as_f64),
            maximum_nights: raw.maximum_nights.as_ref().and_then(ExtNumber::as_f64),
            room_type: raw.room_type.unwrap_or_else(|| UNKNOWN.to_string()),
            bedrooms: raw.bedrooms.as_ref().and_then(ExtNumber::as_f64),
            beds: raw.beds.as_ref().and_then(ExtNumber::as_i64),
            bathrooms: raw.bathrooms.as_ref().and_then(ExtNumber::as_f64),
            amenities_count: derive_amenities_count(raw.amenities.as_deref()),
            number_of_reviews,
        })
    }

    /// Pull `(latitude, longitude)` out of `address.location.coordinates`.
    ///
    /// Source order is `[longitude, latitude]` - index 0 is longitude.
    /// A missing path yields `(None, None)` in lenient mode and a
    /// `MissingField` error in strict mode; a present-but-unusable pair is
    /// a `MalformedCoordinates` error in both.
    fn extract_coordinates(
        &self,
        index: usize,
        address: Option<&RawAddress>,
    ) -> Result<(Option<f64>, Option<f64>), NormalizeError> {
        let Some(location) = address.and_then(|a| a.location.as_ref()) else {
            return match self.config.mode {
                FieldMode::Strict => Err(NormalizeError::MissingField {
                    index,
                    field: "address.location.coordinates",
                }),
                FieldMode::Lenient => Ok((None, None)),
            };
        };

        let coords = &location.coordinates;
        let longitude = coords.first().and_then(ExtNumber::as_f64);
        let latitude = coords.get(1).and_then(ExtNumber::as_f64);

        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok((Some(lat), Some(lon))),
            _ => Err(NormalizeError::MalformedCoordinates {
                index,
                detail: format!(
                    "expected a [longitude, latitude] pair, got {} usable element(s)",
                    coords.iter().filter(|c| c.as_f64().is_some()).count()
                ),
            }),
        }
    }
}

/// Month (1-12) of a `last_scraped` stamp; anything unparsable is `None`.
pub fn derive_month(stamp: &Value) -> Option<u32> {
    let text = stamp.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.month());
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d.month());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.month());
    }
    None
}

/// Map a review count onto the 5-10 rating scale.
///
/// Band upper bounds are inclusive: a count of exactly 50 stays at 5.
/// A missing count is treated as zero by the caller, so every row gets a
/// rating.
pub fn derive_rating(review_count: i64) -> u8 {
    match review_count {
        i64::MIN..=50 => 5,
        51..=100 => 6,
        101..=150 => 7,
        151..=200 => 8,
        201..=250 => 9,
        _ => 10,
    }
}

/// Length of the amenities array, or 0 when it is absent.
pub fn derive_amenities_count(amenities: Option<&[Value]>) -> u64 {
    amenities.map(|a| a.len() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lenient() -> ListingNormalizer {
        ListingNormalizer::new(NormalizeConfig::default())
    }

    fn strict() -> ListingNormalizer {
        ListingNormalizer::new(NormalizeConfig::strict())
    }

    fn manly_record() -> Value {
        json!({
            "name": "Harbour Loft",
            "property_type": "Apartment",
            "address": {
                "country_code": "AU",
                "suburb": "Manly",
                "city": "Sydney",
                "location": {"coordinates": [151.28, -33.79]}
            },
            "price": {"$numberDouble": "210.0"},
            "number_of_reviews": {"$numberInt": "12"},
            "beds": 2,
            "bathrooms": {"$numberDouble": "1.5"},
            "last_scraped": "2019-03-06T05:00:00.000Z",
            "amenities": ["Wifi", "Kitchen", "Heating"]
        })
    }

    #[test]
    fn test_coordinate_axis_order() {
        // Source order is [longitude, latitude]; getting this backwards is
        // the classic mistake, so pin it down.
        let listing = lenient().normalize_one(0, &manly_record()).unwrap();
        assert_eq!(listing.latitude, Some(-33.79));
        assert_eq!(listing.longitude, Some(151.28));
    }

    #[test]
    fn test_full_projection() {
        let listing = lenient().normalize_one(0, &manly_record()).unwrap();
        assert_eq!(listing.name, "Harbour Loft");
        assert_eq!(listing.price, Some(210.0));
        assert_eq!(listing.month, Some(3));
        assert_eq!(listing.country_code.as_deref(), Some("AU"));
        assert_eq!(listing.suburb.as_deref(), Some("Manly"));
        assert_eq!(listing.city, "Sydney");
        assert_eq!(listing.rating, 5);
        assert_eq!(listing.beds, Some(2));
        assert_eq!(listing.bathrooms, Some(1.5));
        assert_eq!(listing.amenities_count, 3);
        assert_eq!(listing.number_of_reviews, 12);
    }

    #[test]
    fn test_rating_band_boundaries() {
        assert_eq!(derive_rating(50), 5);
        assert_eq!(derive_rating(51), 6);
        assert_eq!(derive_rating(250), 9);
        assert_eq!(derive_rating(251), 10);
    }

    #[test]
    fn test_rating_is_monotonic() {
        let mut previous = derive_rating(0);
        for count in 1..400 {
            let rating = derive_rating(count);
            assert!(rating >= previous, "rating decreased at count {count}");
            previous = rating;
        }
    }

    #[test]
    fn test_month_parses_common_forms() {
        assert_eq!(derive_month(&json!("2019-02-16T05:00:00.000Z")), Some(2));
        assert_eq!(derive_month(&json!("2019-11-03")), Some(11));
        assert_eq!(derive_month(&json!("2019-07-04 10:30:00")), Some(7));
    }

    #[test]
    fn test_unparsable_stamp_yields_null_month() {
        assert_eq!(derive_month(&json!("last tuesday")), None);
        assert_eq!(derive_month(&json!({"$date": 1550293200000i64})), None);

        let mut record = manly_record();
        record["last_scraped"] = json!("not a date");
        let listing = lenient().normalize_one(0, &record).unwrap();
        assert_eq!(listing.month, None);
    }

    #[test]
    fn test_named_defaults_for_absent_fields() {
        let listing = lenient().normalize_one(0, &json!({})).unwrap();
        assert_eq!(listing.name, "Unknown");
        assert_eq!(listing.city, "Unknown");
        assert_eq!(listing.room_type, "Unknown");
        assert_eq!(listing.latitude, None);
        assert_eq!(listing.price, None);
        assert_eq!(listing.suburb, None);
        assert_eq!(listing.amenities_count, 0);
        assert_eq!(listing.number_of_reviews, 0);
        // Missing review count counts as zero reviews.
        assert_eq!(listing.rating, 5);
    }

    #[test]
    fn test_strict_mode_rejects_missing_location() {
        let record = json!({"address": {"country_code": "AU", "suburb": "Manly"}});
        let err = strict().normalize_one(3, &record).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField { .. }));
        assert_eq!(err.index(), 3);
    }

    #[test]
    fn test_strict_mode_rejects_missing_country_code() {
        let mut record = manly_record();
        record["address"]
            .as_object_mut()
            .unwrap()
            .remove("country_code");
        let err = strict().normalize_one(0, &record).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField {
                field: "address.country_code",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_coordinates_drop_in_lenient_batch() {
        let mut short = manly_record();
        short["address"]["location"]["coordinates"] = json!([151.28]);
        let records = vec![manly_record(), short];

        let outcome = lenient().normalize_all(&records).unwrap();
        assert_eq!(outcome.rows_read, 2);
        assert_eq!(outcome.rows_kept(), 1);
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(outcome.dropped[0].index, 1);
        assert!(outcome.dropped[0].reason.contains("malformed coordinates"));
    }

    #[test]
    fn test_malformed_coordinates_abort_in_strict_batch() {
        let mut bad = manly_record();
        bad["address"]["location"]["coordinates"] = json!(["east", "south"]);
        let err = strict().normalize_all(&[bad]).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedCoordinates { .. }));
    }

    #[test]
    fn test_non_object_record_is_dropped() {
        let outcome = lenient()
            .normalize_all(&[json!(42), manly_record()])
            .unwrap();
        assert_eq!(outcome.rows_kept(), 1);
        assert_eq!(outcome.dropped[0].index, 0);
    }

    #[test]
    fn test_filter_removes_exactly_the_incomplete_rows() {
        let mut no_price = manly_record();
        no_price.as_object_mut().unwrap().remove("price");
        let mut no_suburb = manly_record();
        no_suburb["address"].as_object_mut().unwrap().remove("suburb");
        let records = vec![manly_record(), no_price, no_suburb];

        let normalizer = ListingNormalizer::new(NormalizeConfig::filtered());
        let outcome = normalizer.normalize_all(&records).unwrap();

        assert_eq!(outcome.rows_kept(), 1);
        assert_eq!(outcome.listings[0].suburb.as_deref(), Some("Manly"));
        let dropped: Vec<usize> = outcome.dropped.iter().map(|d| d.index).collect();
        assert_eq!(dropped, vec![1, 2]);

        // The surviving row is untouched by the filter.
        let unfiltered = lenient().normalize_all(&records).unwrap();
        assert_eq!(outcome.listings[0], unfiltered.listings[0]);
    }

    #[test]
    fn test_numeric_string_passthrough() {
        let mut record = manly_record();
        record["minimum_nights"] = json!("2");
        record["price"] = json!(99);
        let listing = lenient().normalize_one(0, &record).unwrap();
        assert_eq!(listing.minimum_nights, Some(2.0));
        assert_eq!(listing.price, Some(99.0));
    }
}

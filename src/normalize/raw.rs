//! The untrusted input shape: every field optional, unknown fields ignored.
//!
//! Listings arrive as MongoDB-style extended JSON, so any numeric field may
//! be either a plain number or a tagged wrapper object like
//! `{"$numberDouble": "89.0"}`. [`ExtNumber`] models that union once instead
//! of inspecting keys at every read site.

use serde::Deserialize;
use serde_json::Value;

/// A number as it appears in extended JSON: plain, tagged, or something
/// else entirely that we keep around for best-effort conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExtNumber {
    /// `{"$numberDouble": ...}` wrapper.
    Double {
        #[serde(rename = "$numberDouble")]
        value: TagPayload,
    },
    /// `{"$numberInt": ...}` wrapper.
    Int {
        #[serde(rename = "$numberInt")]
        value: TagPayload,
    },
    /// `{"$numberLong": ...}` wrapper.
    Long {
        #[serde(rename = "$numberLong")]
        value: TagPayload,
    },
    /// Already-clean JSON number.
    Plain(serde_json::Number),
    /// Anything else. Numeric strings still convert; the rest yields `None`.
    Other(Value),
}

/// Tagged wrappers carry their payload as either a bare number or a
/// numeric string, depending on which extended-JSON dialect produced them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagPayload {
    Num(serde_json::Number),
    Text(String),
}

impl TagPayload {
    fn as_f64(&self) -> Option<f64> {
        match self {
            TagPayload::Num(n) => n.as_f64(),
            TagPayload::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            TagPayload::Num(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            TagPayload::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
        }
    }
}

impl ExtNumber {
    /// Unwrap to a float. Plain numbers pass through unchanged, tagged
    /// wrappers are unwrapped and cast, numeric strings convert best-effort.
    /// Unwrapping is idempotent: re-wrapping the result as [`ExtNumber::Plain`]
    /// and unwrapping again yields the same value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtNumber::Plain(n) => n.as_f64(),
            ExtNumber::Double { value }
            | ExtNumber::Int { value }
            | ExtNumber::Long { value } => value.as_f64(),
            ExtNumber::Other(Value::String(s)) => s.trim().parse().ok(),
            ExtNumber::Other(_) => None,
        }
    }

    /// Unwrap to an integer, truncating fractional payloads.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ExtNumber::Plain(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            ExtNumber::Double { value }
            | ExtNumber::Int { value }
            | ExtNumber::Long { value } => value.as_i64(),
            ExtNumber::Other(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            ExtNumber::Other(_) => None,
        }
    }
}

/// One raw listing document as it appears in the source dataset.
///
/// Every field is optional; named defaults are applied when the record is
/// normalized, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub name: Option<String>,
    pub property_type: Option<String>,
    pub room_type: Option<String>,
    pub address: Option<RawAddress>,
    pub price: Option<ExtNumber>,
    pub bathrooms: Option<ExtNumber>,
    pub bedrooms: Option<ExtNumber>,
    pub beds: Option<ExtNumber>,
    pub number_of_reviews: Option<ExtNumber>,
    pub minimum_nights: Option<ExtNumber>,
    pub maximum_nights: Option<ExtNumber>,
    pub availability_30: Option<ExtNumber>,
    /// Kept as a raw value: real exports carry a string here, but anything
    /// unparsable must degrade to a null month rather than fail the record.
    pub last_scraped: Option<Value>,
    pub amenities: Option<Vec<Value>>,
}

/// The nested `address` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    pub country_code: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub location: Option<RawLocation>,
}

/// GeoJSON-style point: `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    pub coordinates: Vec<ExtNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ext(value: serde_json::Value) -> ExtNumber {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_number_passes_through() {
        assert_eq!(ext(json!(89.5)).as_f64(), Some(89.5));
        assert_eq!(ext(json!(3)).as_i64(), Some(3));
    }

    #[test]
    fn test_tagged_double_with_string_payload() {
        let n = ext(json!({"$numberDouble": "210.0"}));
        assert_eq!(n.as_f64(), Some(210.0));
    }

    #[test]
    fn test_tagged_int_with_numeric_payload() {
        let n = ext(json!({"$numberInt": 42}));
        assert_eq!(n.as_i64(), Some(42));
        assert_eq!(n.as_f64(), Some(42.0));
    }

    #[test]
    fn test_tagged_long() {
        let n = ext(json!({"$numberLong": "9000000000"}));
        assert_eq!(n.as_i64(), Some(9_000_000_000));
    }

    #[test]
    fn test_numeric_string_converts_best_effort() {
        let n = ext(json!("2"));
        assert_eq!(n.as_i64(), Some(2));
        assert_eq!(n.as_f64(), Some(2.0));
    }

    #[test]
    fn test_garbage_yields_none() {
        assert_eq!(ext(json!("two")).as_f64(), None);
        assert_eq!(ext(json!({"unrelated": 1})).as_i64(), None);
        assert_eq!(ext(json!([1, 2])).as_f64(), None);
    }

    #[test]
    fn test_unwrap_is_idempotent() {
        let once = ext(json!({"$numberDouble": "15.5"})).as_f64().unwrap();
        let number = serde_json::Number::from_f64(once).unwrap();
        let twice = ExtNumber::Plain(number).as_f64().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_raw_listing_ignores_unknown_fields() {
        let raw: RawListing = serde_json::from_value(json!({
            "name": "Harbour Loft",
            "host_listing_count": 7,
            "address": {"suburb": "Manly", "street": "The Corso"}
        }))
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("Harbour Loft"));
        assert_eq!(raw.address.unwrap().suburb.as_deref(), Some("Manly"));
    }
}

use thiserror::Error;

/// Per-record failures raised while normalizing raw listing documents.
///
/// In lenient mode these become dropped-row reports; in strict mode the
/// first one aborts the batch.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A required nested path is absent (strict mode only).
    #[error("record {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// `address.location.coordinates` is present but not a usable
    /// `[longitude, latitude]` pair.
    #[error("record {index}: malformed coordinates: {detail}")]
    MalformedCoordinates { index: usize, detail: String },

    /// The raw element could not be read as a listing document at all.
    #[error("record {index}: unreadable record: {detail}")]
    UnreadableRecord { index: usize, detail: String },
}

impl NormalizeError {
    /// Index of the input record this error refers to.
    pub fn index(&self) -> usize {
        match self {
            NormalizeError::MissingField { index, .. }
            | NormalizeError::MalformedCoordinates { index, .. }
            | NormalizeError::UnreadableRecord { index, .. } => *index,
        }
    }
}

//! Turning free-form model output into a [`RecognitionOutcome`].
//!
//! Raw text goes through four stages: isolate the JSON object, repair it
//! lexically, parse and coerce it strictly, and, if parsing fails, salvage
//! individual fields with regexes.

pub mod coerce;
pub mod extract;
pub mod repair;
pub mod salvage;

use serde_json::Value;
use thiserror::Error;

use crate::error::{ExtractError, ParseError};
use crate::types::{RecognitionFailure, RecognitionOutcome};

pub use coerce::{backfill_nutrition, coerce_recognition, parse_object};
pub use extract::{extract_object, extract_object_or_tail, strip_code_fence};
pub use repair::normalize;
pub use salvage::{salvage, SALVAGED_CONFIDENCE};

/// Run a raw recognition response through the whole pipeline.
pub fn interpret_recognition(raw: &str) -> RecognitionOutcome {
    let object = match extract_object_or_tail(raw) {
        Ok(object) => object,
        Err(e) => {
            tracing::debug!(error = %e, len = raw.len(), "no JSON object in model response");
            return RecognitionOutcome::Failed(RecognitionFailure::Unprocessable);
        }
    };

    let cleaned = normalize(object);
    match parse_object(&cleaned) {
        Ok(value) => coerce_recognition(&value),
        Err(e) => {
            tracing::debug!(error = %e, "strict parse failed, falling back to salvage");
            salvage(&cleaned)
        }
    }
}

/// Why a response could not be read as a JSON object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Extract, repair and parse a JSON object from model output, without any
/// recognition-specific coercion. Used for recipe-search responses.
pub fn parse_json_object(raw: &str) -> Result<Value, ObjectError> {
    let object = extract_object_or_tail(raw)?;
    Ok(parse_object(&normalize(object))?)
}

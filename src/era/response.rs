//! Parsing of untrusted classifier replies.
//!
//! The reply is free text that is supposed to contain a JSON object with a
//! `books` array. Nothing about it is trusted: the payload is located by
//! brace scanning, decoded into a loose [`Value`], and each entry passes a
//! per-field type check before it becomes an [`EraResult`]. Malformed input
//! never produces an error, only `None` slots.

use crate::model::EraResult;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Parse a classifier reply into one slot per returned entry.
///
/// When no JSON payload with a `books` array can be recovered the result is
/// `expected_count` `None`s. Otherwise the result has exactly as many slots as
/// the payload's `books` array, which may differ from `expected_count`; use
/// [`parse_era_batch`] when positional alignment with the request matters.
pub fn parse_era_response(raw: &str, expected_count: usize) -> Vec<Option<EraResult>> {
    let all_none = || vec![None; expected_count];

    let Some(payload) = extract_json_object(raw) else {
        debug!("Classifier reply contains no JSON object");
        return all_none();
    };

    let decoded: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Classifier reply is not valid JSON");
            return all_none();
        }
    };

    let Some(entries) = decoded.get("books").and_then(Value::as_array) else {
        debug!("Classifier reply has no books array");
        return all_none();
    };

    entries.iter().map(validate_entry).collect()
}

/// Parse a reply and align it to the request batch.
///
/// Extra entries are dropped and missing ones padded with `None`, so slot `i`
/// always belongs to book `i` of the batch as long as the classifier kept
/// order.
pub fn parse_era_batch(raw: &str, expected_count: usize) -> Vec<Option<EraResult>> {
    reconcile(parse_era_response(raw, expected_count), expected_count)
}

/// Pad with `None` or truncate `results` to exactly `expected_count`.
pub fn reconcile(mut results: Vec<Option<EraResult>>, expected_count: usize) -> Vec<Option<EraResult>> {
    if results.len() != expected_count {
        warn!(
            expected = expected_count,
            received = results.len(),
            "Classifier returned a different number of entries than requested"
        );
        results.resize(expected_count, None);
    }
    results
}

/// Span from the first `{` to the last `}`, if the latter follows the former.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Type-check one entry. Only `hasHistoricalEra` is required.
fn validate_entry(entry: &Value) -> Option<EraResult> {
    let fields = entry.as_object()?;
    let has_historical_era = fields.get("hasHistoricalEra")?.as_bool()?;

    Some(EraResult {
        has_historical_era,
        start_year: year_field(fields, "startYear"),
        end_year: year_field(fields, "endYear"),
        era_label: fields
            .get("eraLabel")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// A numeric field as a whole year.
///
/// Fractional values round to the nearest year; values outside the `i32`
/// range are treated as absent.
fn year_field(fields: &Map<String, Value>, key: &str) -> Option<i32> {
    let Value::Number(number) = fields.get(key)? else {
        return None;
    };

    if let Some(whole) = number.as_i64() {
        return i32::try_from(whole).ok();
    }

    let value = number.as_f64()?.round();
    (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)).then_some(value as i32)
}

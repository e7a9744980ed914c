//! Normalize inference payloads into candidate references

use crate::error::NormalizationError;
use circlink_domain::{CandidateReference, Confidence};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Text used when a record does not carry the reference text
pub const PLACEHOLDER_TEXT: &str = "Unspecified reference";

/// Reference type used when a record does not carry one
pub const UNKNOWN_TYPE: &str = "unknown";

/// Matched-target values meaning "no local match"
const NO_MATCH_SENTINELS: &[&str] = &["external", "none", "null", "n/a", "na", "not found"];

/// Parse an inference payload into candidate references
///
/// The payload must decode to a JSON array, either as is or once the code
/// fences around it are stripped; otherwise the whole call fails and nothing
/// is returned. Inside the array,
/// missing optional fields are defaulted and non-object entries are skipped.
pub fn normalize_candidates(payload: &str) -> Result<Vec<CandidateReference>, NormalizationError> {
    // Fences can also appear inside string values, so a payload that already
    // decodes is never stripped
    let json: Value = match serde_json::from_str(payload.trim()) {
        Ok(json) => json,
        Err(_) => serde_json::from_str(strip_wrappers(payload))
            .map_err(|e| NormalizationError(format!("JSON parse error: {}", e)))?,
    };

    let records = json
        .as_array()
        .ok_or_else(|| NormalizationError("Expected JSON array".to_string()))?;

    let mut candidates = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        match record.as_object() {
            Some(obj) => candidates.push(parse_record(obj)),
            None => warn!("Record {} is not a JSON object, skipping", idx),
        }
    }

    debug!("Normalized {} of {} records", candidates.len(), records.len());
    Ok(candidates)
}

/// Strip presentation markers (markdown code fences) around the payload
fn strip_wrappers(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    // Skip the fence and its language tag, if any
    let body = trimmed[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

fn parse_record(obj: &Map<String, Value>) -> CandidateReference {
    CandidateReference {
        text: non_empty_str(obj, "text").unwrap_or_else(|| PLACEHOLDER_TEXT.to_string()),
        reference_type: non_empty_str(obj, "type").unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        circular_number: non_empty_str(obj, "circular_number"),
        title: non_empty_str(obj, "title"),
        page: obj.get("page").and_then(parse_page),
        context: non_empty_str(obj, "context").unwrap_or_default(),
        confidence: obj
            .get("confidence")
            .and_then(Value::as_str)
            .map(Confidence::parse)
            .unwrap_or_default(),
        reasoning: non_empty_str(obj, "reasoning").unwrap_or_default(),
        matched_target: obj
            .get("matched_local_file")
            .or_else(|| obj.get("matched_target"))
            .and_then(normalize_target),
    }
}

fn non_empty_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_page(value: &Value) -> Option<u32> {
    let page = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(page).ok().filter(|p| *p > 0)
}

/// Normalize a matched target; anything that is not an identifier is absent
pub fn normalize_target(value: &Value) -> Option<String> {
    let target = value.as_str()?.trim();
    if target.is_empty() || NO_MATCH_SENTINELS.contains(&target.to_lowercase().as_str()) {
        return None;
    }
    Some(target.to_string())
}

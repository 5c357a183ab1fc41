//! Decoders for the response envelope and its candidates.
//!
//! Absent-field handling is a per-field decision, listed here in one place:
//!
//! | field                            | absent or `null` |
//! |----------------------------------|------------------|
//! | `candidates`                     | empty list       |
//! | `promptFeedback`                 | unset            |
//! | `candidate.content`              | empty `Content`  |
//! | `candidate.safetyRatings`        | empty list       |
//! | `candidate.finishReason`         | unset            |
//! | `candidate.citationMetadata`     | unset            |
//! | `promptFeedback.blockReason`     | unset            |
//! | `promptFeedback.safetyRatings`   | empty list       |
//!
//! Leaf records (`SafetyRating`, `Citation`, ...) have no defaults: a missing
//! field there is a [`DecodeError::LeafDecodeFailure`].

use crate::config::DecoderConfig;
use crate::enums::BlockReason;
use crate::enums::FinishReason;
use crate::error::DecodeError;
use crate::error::Result;
use crate::types::Candidate;
use crate::types::CitationMetadata;
use crate::types::Content;
use crate::types::PromptFeedback;
use crate::types::Response;
use crate::types::SafetyRating;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::de::Error as DeError;
use serde::de::Unexpected;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use tracing::warn;

// ============================================================================
// Field Rules
// ============================================================================

/// Wire key of a field and the value it takes when absent or `null`.
struct FieldRule<T> {
    key: &'static str,
    on_absent: fn() -> T,
}

fn unset<T>() -> Option<T> {
    None
}

const RESPONSE_CANDIDATES: FieldRule<Vec<Candidate>> = FieldRule {
    key: "candidates",
    on_absent: Vec::new,
};

const RESPONSE_PROMPT_FEEDBACK: FieldRule<Option<PromptFeedback>> = FieldRule {
    key: "promptFeedback",
    on_absent: unset,
};

const CANDIDATE_CONTENT: FieldRule<Content> = FieldRule {
    key: "content",
    on_absent: Content::default,
};

const CANDIDATE_SAFETY_RATINGS: FieldRule<Vec<SafetyRating>> = FieldRule {
    key: "safetyRatings",
    on_absent: Vec::new,
};

const CANDIDATE_FINISH_REASON: FieldRule<Option<FinishReason>> = FieldRule {
    key: "finishReason",
    on_absent: unset,
};

const CANDIDATE_CITATION_METADATA: FieldRule<Option<CitationMetadata>> = FieldRule {
    key: "citationMetadata",
    on_absent: unset,
};

const FEEDBACK_BLOCK_REASON: FieldRule<Option<BlockReason>> = FieldRule {
    key: "blockReason",
    on_absent: unset,
};

const FEEDBACK_SAFETY_RATINGS: FieldRule<Vec<SafetyRating>> = FieldRule {
    key: "safetyRatings",
    on_absent: Vec::new,
};

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Decode one field of `obj` according to `rule`.
///
/// `decode` receives the field value and its JSON path.
fn decode_field<T, F>(
    obj: &Map<String, Value>,
    rule: &FieldRule<T>,
    prefix: &str,
    decode: F,
) -> Result<T>
where
    F: FnOnce(&Value, &str) -> Result<T>,
{
    match obj.get(rule.key) {
        None | Some(Value::Null) => Ok((rule.on_absent)()),
        Some(value) => decode(value, &join_path(prefix, rule.key)),
    }
}

/// Decode a leaf value, reporting the full JSON path on failure.
fn decode_leaf<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| DecodeError::leaf(path, e))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// Decode a candidate's `content`, classifying failures.
///
/// A value that is not a `Content` is re-read as a string map purely to tell
/// the empty-object service defect apart from other malformed content.
fn decode_content(value: &Value, index: usize) -> Result<Content> {
    let result = if value.is_object() {
        Content::deserialize(value)
    } else {
        Err(serde_json::Error::invalid_type(
            Unexpected::Other(json_type(value)),
            &"a content object",
        ))
    };
    let source = match result {
        Ok(content) => return Ok(content),
        Err(source) => source,
    };

    match HashMap::<String, String>::deserialize(value) {
        Ok(map) if map.is_empty() => {
            warn!(
                candidate_index = index,
                "Candidate content is an empty object, a known service encoding defect"
            );
            Err(DecodeError::EmptyContentBug { index, source })
        }
        _ => Err(DecodeError::MalformedContent { index, source }),
    }
}

/// Decode the candidate at position `index` of the `candidates` list.
///
/// Either the whole candidate decodes or an error is returned; no partially
/// filled candidate is produced.
pub fn decode_candidate(value: &Value, index: usize) -> Result<Candidate> {
    let path = format!("{}[{index}]", RESPONSE_CANDIDATES.key);
    let Some(obj) = value.as_object() else {
        return Err(DecodeError::ShapeMismatch {
            path,
            expected: "a candidate object",
        });
    };

    let content = decode_field(obj, &CANDIDATE_CONTENT, &path, |v, _| {
        decode_content(v, index)
    })?;
    let safety_ratings = decode_field(obj, &CANDIDATE_SAFETY_RATINGS, &path, decode_leaf)?;
    let finish_reason = decode_field(obj, &CANDIDATE_FINISH_REASON, &path, |v, p| {
        decode_leaf(v, p).map(Some)
    })?;
    let citation_metadata = decode_field(obj, &CANDIDATE_CITATION_METADATA, &path, |v, p| {
        decode_leaf(v, p).map(Some)
    })?;

    Ok(Candidate {
        content,
        safety_ratings,
        finish_reason,
        citation_metadata,
    })
}

fn decode_candidates(value: &Value, path: &str) -> Result<Vec<Candidate>> {
    let Some(items) = value.as_array() else {
        return Err(DecodeError::ShapeMismatch {
            path: path.to_string(),
            expected: "an array of candidates",
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_candidate(item, index))
        .collect()
}

// ============================================================================
// Prompt Feedback & Response
// ============================================================================

/// Decode a `promptFeedback` object found at `path`.
pub fn decode_prompt_feedback(value: &Value, path: &str) -> Result<PromptFeedback> {
    let Some(obj) = value.as_object() else {
        return Err(DecodeError::ShapeMismatch {
            path: path.to_string(),
            expected: "a prompt feedback object",
        });
    };

    let block_reason = decode_field(obj, &FEEDBACK_BLOCK_REASON, path, |v, p| {
        decode_leaf(v, p).map(Some)
    })?;
    let safety_ratings = decode_field(obj, &FEEDBACK_SAFETY_RATINGS, path, decode_leaf)?;

    Ok(PromptFeedback {
        block_reason,
        safety_ratings,
    })
}

/// Decode a response document.
///
/// Fails with [`DecodeError::MissingEnvelopeData`] unless the root object has
/// a `candidates` or `promptFeedback` key. A key holding `null` counts as
/// present.
pub fn decode_response(value: &Value) -> Result<Response> {
    let Some(obj) = value.as_object().filter(|obj| {
        obj.contains_key(RESPONSE_CANDIDATES.key) || obj.contains_key(RESPONSE_PROMPT_FEEDBACK.key)
    }) else {
        return Err(DecodeError::MissingEnvelopeData);
    };

    let candidates = decode_field(obj, &RESPONSE_CANDIDATES, "", decode_candidates)?;
    let prompt_feedback = decode_field(obj, &RESPONSE_PROMPT_FEEDBACK, "", |v, p| {
        decode_prompt_feedback(v, p).map(Some)
    })?;

    Ok(Response {
        candidates,
        prompt_feedback,
    })
}

/// Parse and decode a response from JSON text.
pub fn decode_response_str(json: &str) -> Result<Response> {
    let value: Value = serde_json::from_str(json)?;
    decode_response(&value)
}

// ============================================================================
// ResponseDecoder
// ============================================================================

/// Response decoder with logging configuration.
///
/// Decoding is pure; the decoder only adds diagnostics on failure. It holds
/// no mutable state and can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder {
    config: DecoderConfig,
}

impl ResponseDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a response document, logging failures.
    pub fn decode(&self, value: &Value) -> Result<Response> {
        decode_response(value).inspect_err(|err| self.log_failure(err, Some(value)))
    }

    /// Parse and decode a response from JSON text, logging failures.
    pub fn decode_str(&self, json: &str) -> Result<Response> {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                let err = DecodeError::InvalidJson(e);
                self.log_failure(&err, None);
                return Err(err);
            }
        };
        self.decode(&value)
    }

    fn log_failure(&self, err: &DecodeError, value: Option<&Value>) {
        match value.filter(|_| self.config.log_payload_on_error) {
            Some(value) => {
                let payload: String = value
                    .to_string()
                    .chars()
                    .take(self.config.preview_chars)
                    .collect();
                debug!(
                    error = %err,
                    kind = ?err.kind(),
                    payload = %payload,
                    "Failed to decode response"
                );
            }
            None => debug!(error = %err, kind = ?err.kind(), "Failed to decode response"),
        }
    }
}

#[cfg(test)]
#[path = "decode.test.rs"]
mod tests;

//! Domain model for Gemini `generateContent` responses.
//!
//! Leaf records (`SafetyRating`, `Citation`, `Part`, ...) decode with serde
//! derive. `Candidate` and `Response` decode through [`crate::decode`], which
//! applies the per-field defaulting rules and classifies content failures.

use crate::enums::BlockReason;
use crate::enums::FinishReason;
use crate::enums::HarmCategory;
use crate::enums::HarmProbability;
use base64::Engine;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as DeError;
use tracing::warn;

/// Preview length used by [`Candidate::debug_summary`] by default.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

// ============================================================================
// Base64 Serde Helpers
// ============================================================================

fn serialize_bytes_base64<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

fn deserialize_bytes_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD
        .decode(&s)
        .map_err(|e| DeError::custom(format!("base64 decode error: {e}")))
}

// ============================================================================
// Content
// ============================================================================

/// Raw media bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The IANA standard MIME type of the source data.
    pub mime_type: String,

    /// Raw bytes, base64 on the wire.
    #[serde(
        serialize_with = "serialize_bytes_base64",
        deserialize_with = "deserialize_bytes_base64"
    )]
    pub data: Vec<u8>,
}

/// One part of a multi-part content body.
///
/// Parts of a kind this crate does not model decode with every field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline bytes data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create an inline data part.
    pub fn inline(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
            ..Default::default()
        }
    }

    fn summary(&self, preview_chars: usize) -> String {
        if let Some(text) = &self.text {
            let preview: String = text.chars().take(preview_chars).collect();
            let ellipsis = if preview.len() < text.len() { "..." } else { "" };
            format!("text({} chars): {preview:?}{ellipsis}", text.chars().count())
        } else if let Some(blob) = &self.inline_data {
            format!("inline_data({}, {} bytes)", blob.mime_type, blob.data.len())
        } else {
            "unknown".to_string()
        }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::text(text)
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::text(text)
    }
}

/// The ordered, multi-part body of a candidate.
///
/// `parts` is required when the `content` key is present; a missing `content`
/// key is represented by `Content::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// The producer of the content, usually `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Parts that constitute the body, in order.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create model content with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::with_parts("model", vec![Part::text(text)])
    }

    /// Create content with multiple parts.
    pub fn with_parts(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.into()),
            parts,
        }
    }

    /// Check if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

// ============================================================================
// Safety & Citations
// ============================================================================

/// Safety rating for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    /// The harm category.
    pub category: HarmCategory,

    /// The harm probability.
    pub probability: HarmProbability,
}

impl SafetyRating {
    pub fn new(category: HarmCategory, probability: HarmProbability) -> Self {
        Self {
            category,
            probability,
        }
    }
}

/// An attributed source span within generated content.
///
/// `start_index` is inclusive and `end_index` exclusive. Neither is checked at
/// decode time; see [`Citation::span`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub start_index: i64,
    pub end_index: i64,
    pub uri: String,
    pub license: String,
}

impl Citation {
    /// The cited range as `usize` offsets, or `None` if it is negative or inverted.
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(self.start_index).ok()?;
        let end = usize::try_from(self.end_index).ok()?;
        (start <= end).then_some(start..end)
    }

    /// Slice `text` by this citation's span, if it lies on char boundaries within `text`.
    pub fn cited_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.span()?)
    }
}

/// Citation metadata for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    /// Citations, in order.
    pub citation_sources: Vec<Citation>,
}

// ============================================================================
// Candidate & Response
// ============================================================================

/// Feedback about the prompt, present when the prompt was rated or blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// The reason the prompt was blocked, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,

    /// Safety ratings for the prompt. Empty when absent from the payload.
    pub safety_ratings: Vec<SafetyRating>,
}

impl PromptFeedback {
    pub fn new(block_reason: Option<BlockReason>, safety_ratings: Vec<SafetyRating>) -> Self {
        Self {
            block_reason,
            safety_ratings,
        }
    }
}

/// One proposed reply among possibly several for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content. Empty when the service sent no `content`.
    pub content: Content,

    /// Safety ratings. Empty when absent from the payload.
    pub safety_ratings: Vec<SafetyRating>,

    /// Why generation stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Citation metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
}

impl Candidate {
    pub fn new(
        content: Content,
        safety_ratings: Vec<SafetyRating>,
        finish_reason: Option<FinishReason>,
        citation_metadata: Option<CitationMetadata>,
    ) -> Self {
        Self {
            content,
            safety_ratings,
            finish_reason,
            citation_metadata,
        }
    }

    /// Text of the first part, if that part carries text.
    pub fn first_text(&self) -> Option<&str> {
        self.content.parts.first()?.text.as_deref()
    }

    /// Format a one-line summary of this candidate for logging.
    pub fn debug_summary(&self, preview_chars: usize) -> String {
        let finish = self
            .finish_reason
            .map_or_else(|| "none".to_string(), |r| r.to_string());
        let parts = if self.content.parts.is_empty() {
            "no parts".to_string()
        } else {
            self.content
                .parts
                .iter()
                .map(|p| p.summary(preview_chars))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("finish={finish}, parts=[{parts}]")
    }
}

/// A fully decoded reply from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Candidates, best first. Order is preserved from the payload.
    pub candidates: Vec<Candidate>,

    /// Prompt feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl Response {
    pub fn new(candidates: Vec<Candidate>, prompt_feedback: Option<PromptFeedback>) -> Self {
        Self {
            candidates,
            prompt_feedback,
        }
    }

    /// Text of the first part of the first candidate.
    ///
    /// Returns `None`, with a warning, when there are no candidates or the
    /// first part carries no text.
    pub fn text(&self) -> Option<&str> {
        let Some(candidate) = self.candidates.first() else {
            warn!("Could not get text from a response that had no candidates");
            return None;
        };
        let text = candidate.first_text();
        if text.is_none() {
            warn!("Could not get a text part from the first candidate");
        }
        text
    }

    /// Get the finish reason from the first candidate.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates.first()?.finish_reason
    }

    /// Get the parts from the first candidate.
    ///
    /// Warns if there are multiple candidates, as only the first is returned.
    pub fn parts(&self) -> Option<&[Part]> {
        if self.candidates.len() > 1 {
            let all_summaries: Vec<String> = self
                .candidates
                .iter()
                .map(|c| c.debug_summary(DEFAULT_PREVIEW_CHARS))
                .collect();
            warn!(
                candidate_count = self.candidates.len(),
                candidates_detail = %all_summaries.join("\n  "),
                "Response has multiple candidates, only returning parts from the first"
            );
        }
        Some(&self.candidates.first()?.content.parts)
    }

    /// The prompt block reason, if the prompt was blocked.
    pub fn block_reason(&self) -> Option<BlockReason> {
        self.prompt_feedback.as_ref()?.block_reason
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::decode::decode_response(&value).map_err(DeError::custom)
    }
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::decode::decode_candidate(&value, 0).map_err(DeError::custom)
    }
}

impl<'de> Deserialize<'de> for PromptFeedback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::decode::decode_prompt_feedback(&value, "promptFeedback").map_err(DeError::custom)
    }
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;

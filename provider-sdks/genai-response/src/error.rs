//! Error types for response decoding.

use thiserror::Error;

/// Result type alias using DecodeError.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a service response.
///
/// Unrecognized enum values are never reported here; they degrade to the
/// enum's `Unknown` variant instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither `candidates` nor `promptFeedback` was present at the top level.
    #[error("response is missing both `candidates` and `promptFeedback`")]
    MissingEnvelopeData,

    /// A candidate's `content` does not have the `Content` shape.
    #[error("candidate {index} has malformed content: {source}")]
    MalformedContent {
        /// Position of the candidate in the `candidates` list.
        index: usize,
        /// The original shape-mismatch error.
        #[source]
        source: serde_json::Error,
    },

    /// A candidate's `content` was encoded as an empty object (`{}`).
    ///
    /// This is a known service-side encoding defect and usually means the
    /// candidate produced no output.
    #[error("candidate {index} has empty content object (known service encoding defect)")]
    EmptyContentBug {
        /// Position of the candidate in the `candidates` list.
        index: usize,
        /// The original shape-mismatch error.
        #[source]
        source: serde_json::Error,
    },

    /// A required field on a leaf record is absent or has the wrong type.
    #[error("failed to decode `{path}`: {source}")]
    LeafDecodeFailure {
        /// JSON path of the failing value, e.g. `candidates[0].safetyRatings[1]`.
        path: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A container value has the wrong JSON type.
    #[error("expected {expected} at `{path}`")]
    ShapeMismatch {
        /// JSON path of the offending value.
        path: String,
        /// Human-readable description of the expected shape.
        expected: &'static str,
    },

    /// The input text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Coarse classification of a [`DecodeError`], for caller recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    MissingEnvelopeData,
    MalformedContent,
    EmptyContentBug,
    LeafDecodeFailure,
    ShapeMismatch,
    InvalidJson,
}

impl DecodeError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MissingEnvelopeData => DecodeErrorKind::MissingEnvelopeData,
            DecodeError::MalformedContent { .. } => DecodeErrorKind::MalformedContent,
            DecodeError::EmptyContentBug { .. } => DecodeErrorKind::EmptyContentBug,
            DecodeError::LeafDecodeFailure { .. } => DecodeErrorKind::LeafDecodeFailure,
            DecodeError::ShapeMismatch { .. } => DecodeErrorKind::ShapeMismatch,
            DecodeError::InvalidJson(_) => DecodeErrorKind::InvalidJson,
        }
    }

    /// Check if this error is the known empty-content service defect.
    ///
    /// Callers typically treat this as "no output" rather than corruption.
    pub fn is_empty_content_bug(&self) -> bool {
        matches!(self, DecodeError::EmptyContentBug { .. })
    }

    /// Index of the candidate whose content failed to decode, if any.
    pub fn candidate_index(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedContent { index, .. }
            | DecodeError::EmptyContentBug { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Build a leaf failure from a path-tracking serde error.
    ///
    /// `prefix` is the location of the decoded node; the path reported by
    /// serde is appended to it.
    pub(crate) fn leaf(prefix: &str, err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let inner = err.path().to_string();
        let path = if inner.is_empty() || inner == "." {
            prefix.to_string()
        } else if inner.starts_with('[') {
            format!("{prefix}{inner}")
        } else {
            format!("{prefix}.{inner}")
        };
        DecodeError::LeafDecodeFailure {
            path,
            source: err.into_inner(),
        }
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;

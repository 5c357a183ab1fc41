//! Typed decoding for Google Generative AI (Gemini) `generateContent` responses.
//!
//! This crate turns an already-parsed JSON reply into a [`Response`], or a
//! classified [`DecodeError`]. It does no I/O.
//!
//! - Unrecognized enum values decode to an `Unknown` variant with a warning,
//!   so new service values never break decoding.
//! - Missing optional collections default to empty.
//! - A candidate whose `content` is `{}` (a known service encoding defect) is
//!   reported as [`DecodeError::EmptyContentBug`], distinct from
//!   [`DecodeError::MalformedContent`].
//!
//! ```
//! use genai_response::decode_response;
//! use serde_json::json;
//!
//! let response = decode_response(&json!({
//!     "candidates": [{"content": {"parts": [{"text": "Hi!"}]}, "finishReason": 1}]
//! }))?;
//! assert_eq!(response.text(), Some("Hi!"));
//! # Ok::<(), genai_response::DecodeError>(())
//! ```

pub mod chunk;
pub mod config;
pub mod decode;
pub mod enums;
pub mod error;
pub mod outcome;
pub mod types;

pub use config::DecoderConfig;
pub use decode::ResponseDecoder;
pub use decode::decode_response;
pub use decode::decode_response_str;
pub use enums::BlockReason;
pub use enums::FinishReason;
pub use enums::HarmCategory;
pub use enums::HarmProbability;
pub use enums::WireEnum;
pub use error::DecodeError;
pub use error::DecodeErrorKind;
pub use error::Result;
pub use outcome::GenerateContentError;
pub use types::Blob;
pub use types::Candidate;
pub use types::Citation;
pub use types::CitationMetadata;
pub use types::Content;
pub use types::Part;
pub use types::PromptFeedback;
pub use types::Response;
pub use types::SafetyRating;

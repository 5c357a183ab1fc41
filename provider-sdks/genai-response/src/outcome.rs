//! Classification of successfully decoded responses.
//!
//! A response can decode cleanly and still carry no usable output: the prompt
//! may have been blocked, or the first candidate may have stopped for safety
//! or recitation. These are reported separately from [`crate::DecodeError`].

use crate::enums::BlockReason;
use crate::enums::FinishReason;
use crate::types::Response;
use thiserror::Error;

/// Why a decoded response should not be treated as a normal completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateContentError {
    /// The prompt was blocked before any candidate was generated.
    #[error("prompt was blocked: {reason:?}")]
    PromptBlocked {
        reason: BlockReason,
        response: Box<Response>,
    },

    /// The first candidate stopped for a reason other than a normal stop.
    #[error("response stopped early: {reason:?}")]
    ResponseStoppedEarly {
        reason: FinishReason,
        response: Box<Response>,
    },
}

impl GenerateContentError {
    /// The response that triggered the error.
    pub fn response(&self) -> &Response {
        match self {
            GenerateContentError::PromptBlocked { response, .. }
            | GenerateContentError::ResponseStoppedEarly { response, .. } => response,
        }
    }
}

/// Check if a finish reason represents a normal completion.
///
/// `Stop` and `MaxTokens` are normal; so is an unset reason, which the
/// service uses on intermediate streaming chunks.
pub fn is_normal_finish(reason: Option<FinishReason>) -> bool {
    matches!(
        reason,
        None | Some(FinishReason::Stop) | Some(FinishReason::MaxTokens)
    )
}

impl Response {
    /// Classify this response for callers that want only usable output.
    ///
    /// Returns `Err` when prompt feedback carries a block reason, or when the
    /// first candidate finished abnormally.
    pub fn check_outcome(self) -> Result<Response, GenerateContentError> {
        if let Some(reason) = self.block_reason() {
            return Err(GenerateContentError::PromptBlocked {
                reason,
                response: Box::new(self),
            });
        }
        match self.finish_reason() {
            Some(reason) if !is_normal_finish(Some(reason)) => {
                Err(GenerateContentError::ResponseStoppedEarly {
                    reason,
                    response: Box::new(self),
                })
            }
            _ => Ok(self),
        }
    }
}

#[cfg(test)]
#[path = "outcome.test.rs"]
mod tests;

//! Decoder configuration.
//!
//! Configuration only affects diagnostics; decoding semantics are fixed.
//!
//! ```json
//! {
//!   "logPayloadOnError": true,
//!   "previewChars": 200
//! }
//! ```

use crate::error::Result;
use crate::types::DEFAULT_PREVIEW_CHARS;
use serde::Deserialize;
use serde::Serialize;
use std::env;
use tracing::debug;

// Environment variable names
pub const ENV_LOG_PAYLOAD: &str = "GENAI_RESPONSE_LOG_PAYLOAD";
pub const ENV_PREVIEW_CHARS: &str = "GENAI_RESPONSE_PREVIEW_CHARS";

/// Configuration for [`crate::ResponseDecoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecoderConfig {
    /// Include a truncated preview of the raw payload in decode-failure logs.
    pub log_payload_on_error: bool,

    /// Maximum number of characters in payload and text previews.
    pub preview_chars: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            log_payload_on_error: false,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl DecoderConfig {
    /// Parse a JSON configuration document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides.
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_bool(ENV_LOG_PAYLOAD) {
            self.log_payload_on_error = v;
        }
        if let Some(v) = env::var(ENV_PREVIEW_CHARS)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
        {
            self.preview_chars = v;
        }
        debug!(config = ?self, "Loaded decoder config");
        self
    }

    pub fn with_log_payload_on_error(mut self, enabled: bool) -> Self {
        self.log_payload_on_error = enabled;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

fn env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;

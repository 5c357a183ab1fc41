use super::*;
use pretty_assertions::assert_eq;
use serial_test::serial;

// Helper to set and cleanup env vars in tests
struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    fn new() -> Self {
        Self { keys: Vec::new() }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.keys.push(key.to_string());
        // SAFETY: These are test-only operations with controlled keys
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            // SAFETY: Cleaning up test environment variables
            unsafe { env::remove_var(key) };
        }
    }
}

#[test]
fn test_default_config() {
    let config = DecoderConfig::default();
    assert!(!config.log_payload_on_error);
    assert_eq!(config.preview_chars, DEFAULT_PREVIEW_CHARS);
}

#[test]
fn test_from_json_partial() {
    let config = DecoderConfig::from_json_str(r#"{"previewChars": 20}"#).unwrap();
    assert_eq!(
        config,
        DecoderConfig {
            log_payload_on_error: false,
            preview_chars: 20,
        }
    );
}

#[test]
fn test_from_json_invalid() {
    let err = DecoderConfig::from_json_str(r#"{"previewChars": "many"}"#).unwrap_err();
    assert_eq!(err.kind(), crate::error::DecodeErrorKind::InvalidJson);
}

#[test]
#[serial]
fn test_env_overrides() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_LOG_PAYLOAD, "true");
    guard.set(ENV_PREVIEW_CHARS, "12");

    let config = DecoderConfig::from_env();
    assert!(config.log_payload_on_error);
    assert_eq!(config.preview_chars, 12);
}

#[test]
#[serial]
fn test_env_invalid_values_ignored() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_LOG_PAYLOAD, "maybe");
    guard.set(ENV_PREVIEW_CHARS, "-3");

    let config = DecoderConfig::default()
        .with_preview_chars(7)
        .with_env_overrides();
    assert!(!config.log_payload_on_error);
    assert_eq!(config.preview_chars, 7);
}

#[test]
#[serial]
fn test_env_unset_keeps_defaults() {
    let config = DecoderConfig::from_env();
    assert_eq!(config, DecoderConfig::default());
}

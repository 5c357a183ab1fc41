use super::*;
use crate::enums::FinishReason;
use crate::error::DecodeErrorKind;
use pretty_assertions::assert_eq;

// =========================================================================
// ServerSentEvent
// =========================================================================

#[test]
fn test_sse_with_data() {
    let sse = ServerSentEvent::with_data("hello");
    assert_eq!(sse.data, "hello");
    assert!(sse.has_data());
    assert!(!ServerSentEvent::default().has_data());
}

#[test]
fn test_sse_is_done() {
    assert!(ServerSentEvent::with_data("[DONE]").is_done());
    assert!(!ServerSentEvent::with_data("hello").is_done());
}

// =========================================================================
// SseDecoder lines
// =========================================================================

#[test]
fn test_decoder_basic_event() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.decode_line("data: hello").is_none());
    let event = decoder.decode_line("").unwrap();
    assert_eq!(event.data, "hello");
}

#[test]
fn test_decoder_fields() {
    let mut decoder = SseDecoder::new();
    decoder.decode_line("event: message");
    decoder.decode_line("id: 7");
    decoder.decode_line("retry: 3000");
    decoder.decode_line("data:no-space");
    let event = decoder.decode_line("").unwrap();
    assert_eq!(
        event,
        ServerSentEvent {
            event: Some("message".to_string()),
            data: "no-space".to_string(),
            id: Some("7".to_string()),
            retry: Some(3000),
        }
    );

    // id persists, other fields reset
    decoder.decode_line("data: next");
    let event = decoder.decode_line("").unwrap();
    assert_eq!(event.id, Some("7".to_string()));
    assert_eq!(event.event, None);
    assert_eq!(event.retry, None);
}

#[test]
fn test_decoder_multiline_data_and_comments() {
    let mut decoder = SseDecoder::new();
    decoder.decode_line(": keep-alive");
    decoder.decode_line("data: line1");
    decoder.decode_line("data: line2");
    decoder.decode_line("unknown: ignored");
    let event = decoder.decode_line("").unwrap();
    assert_eq!(event.data, "line1\nline2");
}

#[test]
fn test_decoder_empty_line_without_event() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.decode_line("").is_none());
    decoder.decode_line(": comment only");
    assert!(decoder.decode_line("").is_none());
}

#[test]
fn test_decoder_ignores_bad_retry_and_null_id() {
    let mut decoder = SseDecoder::new();
    decoder.decode_line("retry: soon");
    decoder.decode_line("id: a\0b");
    decoder.decode_line("data: x");
    let event = decoder.decode_line("").unwrap();
    assert_eq!(event.retry, None);
    assert_eq!(event.id, None);
}

// =========================================================================
// SseDecoder bytes
// =========================================================================

#[test]
fn test_decode_bytes_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.decode_bytes(b"data: {\"a\"").is_empty());
    let events = decoder.decode_bytes(b": 1}\n\ndata: second\n\n");
    let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
    assert_eq!(data, vec!["{\"a\": 1}", "second"]);
}

#[test]
fn test_decode_bytes_crlf_split() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.decode_bytes(b"data: one\r").is_empty());
    assert!(decoder.decode_bytes(b"\n\r").is_empty());
    let events = decoder.decode_bytes(b"\ndata: two\r\r");
    let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
    assert_eq!(data, vec!["one"]);
    let event = decoder.finish().unwrap();
    assert_eq!(event.data, "two");
}

#[test]
fn test_finish_flushes_unterminated_line() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.decode_bytes(b"data: tail").is_empty());
    assert_eq!(decoder.finish().unwrap().data, "tail");
    assert!(decoder.finish().is_none());
}

// =========================================================================
// decode_event
// =========================================================================

#[test]
fn test_decode_event_response() {
    let decoder = ResponseDecoder::default();
    let event = ServerSentEvent::with_data(
        r#"{"candidates": [{"content": {"parts": [{"text": "Hel"}]}, "finishReason": "STOP"}]}"#,
    );
    let response = decode_event(&decoder, &event).unwrap().unwrap();
    assert_eq!(response.text(), Some("Hel"));
    assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
}

#[test]
fn test_decode_event_skips_done_and_empty() {
    let decoder = ResponseDecoder::default();
    assert_eq!(
        decode_event(&decoder, &ServerSentEvent::with_data("[DONE]")).unwrap(),
        None
    );
    assert_eq!(
        decode_event(&decoder, &ServerSentEvent::default()).unwrap(),
        None
    );
}

#[test]
fn test_decode_event_applies_full_contract() {
    let decoder = ResponseDecoder::default();
    let err = decode_event(
        &decoder,
        &ServerSentEvent::with_data(r#"{"candidates": [{"content": {}}]}"#),
    )
    .unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::EmptyContentBug);

    let err = decode_event(&decoder, &ServerSentEvent::with_data(r#"{"usageMetadata": {}}"#))
        .unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MissingEnvelopeData);

    let err = decode_event(&decoder, &ServerSentEvent::with_data("{")).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::InvalidJson);
}

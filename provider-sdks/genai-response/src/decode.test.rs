use super::*;
use crate::enums::HarmCategory;
use crate::enums::HarmProbability;
use crate::error::DecodeErrorKind;
use crate::types::Citation;
use crate::types::Part;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_candidate() -> Value {
    json!({
        "content": {
            "parts": [{"text": "Hello!"}],
            "role": "model"
        },
        "finishReason": 1,
        "safetyRatings": [
            {"category": "HARM_CATEGORY_HARASSMENT", "probability": "NEGLIGIBLE"}
        ],
        "citationMetadata": {
            "citationSources": [
                {"startIndex": 0, "endIndex": 6, "uri": "https://example.com", "license": "mit"}
            ]
        }
    })
}

// =========================================================================
// Response envelope
// =========================================================================

#[test]
fn test_decode_full_response() {
    let response = decode_response(&json!({
        "candidates": [sample_candidate()],
        "promptFeedback": {
            "safetyRatings": [
                {"category": "HARM_CATEGORY_HATE_SPEECH", "probability": "LOW"}
            ]
        }
    }))
    .unwrap();

    let expected = Response {
        candidates: vec![Candidate {
            content: Content::model("Hello!"),
            safety_ratings: vec![SafetyRating::new(
                HarmCategory::Harassment,
                HarmProbability::Negligible,
            )],
            finish_reason: Some(FinishReason::Stop),
            citation_metadata: Some(CitationMetadata {
                citation_sources: vec![Citation {
                    start_index: 0,
                    end_index: 6,
                    uri: "https://example.com".to_string(),
                    license: "mit".to_string(),
                }],
            }),
        }],
        prompt_feedback: Some(PromptFeedback {
            block_reason: None,
            safety_ratings: vec![SafetyRating::new(
                HarmCategory::HateSpeech,
                HarmProbability::Low,
            )],
        }),
    };
    assert_eq!(response, expected);
    assert_eq!(response.text(), Some("Hello!"));
}

#[test]
fn test_candidates_only() {
    let response = decode_response(&json!({"candidates": [sample_candidate()]})).unwrap();
    assert_eq!(response.candidates.len(), 1);
    assert!(response.prompt_feedback.is_none());
}

#[test]
fn test_prompt_feedback_only() {
    let response = decode_response(&json!({
        "promptFeedback": {"blockReason": "SAFETY"}
    }))
    .unwrap();
    assert!(response.candidates.is_empty());
    assert_eq!(response.block_reason(), Some(BlockReason::Safety));
    assert!(
        response
            .prompt_feedback
            .as_ref()
            .is_some_and(|f| f.safety_ratings.is_empty())
    );
}

#[test]
fn test_missing_envelope_data() {
    let err = decode_response(&json!({"usageMetadata": {"totalTokenCount": 3}})).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MissingEnvelopeData);

    let err = decode_response(&json!({})).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MissingEnvelopeData);
}

#[test]
fn test_non_object_root_is_missing_envelope() {
    for root in [json!(null), json!([]), json!("candidates"), json!(3)] {
        let err = decode_response(&root).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MissingEnvelopeData);
    }
}

#[test]
fn test_null_candidates_key_counts_as_present() {
    let response = decode_response(&json!({"candidates": null})).unwrap();
    assert_eq!(response, Response::default());
}

#[test]
fn test_empty_candidates_list() {
    let response = decode_response(&json!({"candidates": []})).unwrap();
    assert!(response.candidates.is_empty());
    assert_eq!(response.text(), None);
}

#[test]
fn test_candidates_wrong_type() {
    let err = decode_response(&json!({"candidates": {"content": {}}})).unwrap_err();
    match err {
        DecodeError::ShapeMismatch { path, .. } => assert_eq!(path, "candidates"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_candidate_order_preserved() {
    let response = decode_response(&json!({
        "candidates": [
            {"content": {"parts": [{"text": "first"}]}},
            {"content": {"parts": [{"text": "second"}]}},
            {"content": {"parts": [{"text": "third"}]}}
        ]
    }))
    .unwrap();
    let texts: Vec<_> = response
        .candidates
        .iter()
        .map(|c| c.first_text().unwrap_or_default())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

// =========================================================================
// Candidate content
// =========================================================================

#[test]
fn test_absent_content_is_empty() {
    let candidate = decode_candidate(&json!({"finishReason": 3}), 0).unwrap();
    assert!(candidate.content.is_empty());
    assert_eq!(candidate.finish_reason, Some(FinishReason::Safety));
    assert!(candidate.safety_ratings.is_empty());
    assert!(candidate.citation_metadata.is_none());
}

#[test]
fn test_null_content_is_empty() {
    let candidate = decode_candidate(&json!({"content": null}), 0).unwrap();
    assert_eq!(candidate.content, Content::default());
}

#[test]
fn test_empty_object_content_is_known_bug() {
    let err = decode_response(&json!({
        "candidates": [sample_candidate(), {"content": {}, "finishReason": 1}]
    }))
    .unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::EmptyContentBug);
    assert_eq!(err.candidate_index(), Some(1));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_wrong_shaped_content_is_malformed() {
    let err = decode_candidate(&json!({"content": {"foo": 1}}), 0).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MalformedContent);

    // A non-empty string map is still malformed, not the known bug.
    let err = decode_candidate(&json!({"content": {"foo": "bar"}}), 0).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MalformedContent);
}

#[test]
fn test_non_object_content_is_malformed() {
    for content in [json!([]), json!("text"), json!(7), json!([null, []])] {
        let err = decode_candidate(&json!({"content": content}), 4).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedContent);
        assert_eq!(err.candidate_index(), Some(4));
    }
}

#[test]
fn test_bad_parts_is_malformed() {
    let err = decode_candidate(&json!({"content": {"parts": [{"text": 5}]}}), 0).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MalformedContent);
}

#[test]
fn test_unknown_part_kind_is_kept() {
    let candidate = decode_candidate(
        &json!({"content": {"parts": [{"functionCall": {"name": "f"}}, {"text": "after"}]}}),
        0,
    )
    .unwrap();
    assert_eq!(
        candidate.content.parts,
        vec![Part::default(), Part::text("after")]
    );
    assert_eq!(candidate.first_text(), None);
}

#[test]
fn test_inline_data_part() {
    let candidate = decode_candidate(
        &json!({"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AQID"}}]}}),
        0,
    )
    .unwrap();
    assert_eq!(candidate.content.parts, vec![Part::inline("image/png", vec![1, 2, 3])]);
}

#[test]
fn test_candidate_not_object() {
    let err = decode_response(&json!({"candidates": [sample_candidate(), "oops"]})).unwrap_err();
    match err {
        DecodeError::ShapeMismatch { path, expected } => {
            assert_eq!(path, "candidates[1]");
            assert_eq!(expected, "a candidate object");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =========================================================================
// Enum fallback
// =========================================================================

#[test]
fn test_unrecognized_finish_reason() {
    let candidate = decode_candidate(&json!({"finishReason": 99}), 0).unwrap();
    assert_eq!(candidate.finish_reason, Some(FinishReason::Unknown));
}

#[test]
fn test_string_finish_reason() {
    let candidate = decode_candidate(&json!({"finishReason": "MAX_TOKENS"}), 0).unwrap();
    assert_eq!(candidate.finish_reason, Some(FinishReason::MaxTokens));
}

#[test]
fn test_unrecognized_block_reason() {
    let response = decode_response(&json!({
        "promptFeedback": {"blockReason": "NEW_REASON"}
    }))
    .unwrap();
    assert_eq!(response.block_reason(), Some(BlockReason::Unknown));
}

#[test]
fn test_unrecognized_harm_category() {
    let candidate = decode_candidate(
        &json!({"safetyRatings": [{"category": "HARM_CATEGORY_FUTURE", "probability": "HIGH"}]}),
        0,
    )
    .unwrap();
    assert_eq!(
        candidate.safety_ratings,
        vec![SafetyRating::new(HarmCategory::Unknown, HarmProbability::High)]
    );
}

#[test]
fn test_finish_reason_wrong_type() {
    let err = decode_candidate(&json!({"finishReason": true}), 2).unwrap_err();
    match err {
        DecodeError::LeafDecodeFailure { path, .. } => {
            assert_eq!(path, "candidates[2].finishReason");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =========================================================================
// Leaf failures
// =========================================================================

#[test]
fn test_safety_rating_missing_field() {
    let err = decode_candidate(
        &json!({"safetyRatings": [{"category": "HARM_CATEGORY_HARASSMENT"}]}),
        0,
    )
    .unwrap_err();
    match err {
        DecodeError::LeafDecodeFailure { path, source } => {
            assert_eq!(path, "candidates[0].safetyRatings[0]");
            assert!(source.to_string().contains("probability"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_citation_wrong_field_type() {
    let err = decode_candidate(
        &json!({
            "citationMetadata": {
                "citationSources": [
                    {"startIndex": 0, "endIndex": 1, "uri": "a", "license": ""},
                    {"startIndex": 0, "endIndex": 1, "uri": 42, "license": ""}
                ]
            }
        }),
        3,
    )
    .unwrap_err();
    match err {
        DecodeError::LeafDecodeFailure { path, .. } => {
            assert_eq!(path, "candidates[3].citationMetadata.citationSources[1].uri");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_citation_metadata_requires_sources() {
    let err = decode_candidate(&json!({"citationMetadata": {}}), 0).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::LeafDecodeFailure);
}

#[test]
fn test_inverted_citation_span_is_not_validated() {
    let candidate = decode_candidate(
        &json!({
            "citationMetadata": {
                "citationSources": [
                    {"startIndex": 9, "endIndex": 2, "uri": "u", "license": "l"}
                ]
            }
        }),
        0,
    )
    .unwrap();
    let metadata = candidate.citation_metadata.unwrap();
    let citation = &metadata.citation_sources[0];
    assert_eq!(citation.start_index, 9);
    assert_eq!(citation.span(), None);
}

#[test]
fn test_prompt_feedback_wrong_type() {
    let err = decode_response(&json!({"promptFeedback": "blocked"})).unwrap_err();
    match err {
        DecodeError::ShapeMismatch { path, .. } => assert_eq!(path, "promptFeedback"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_prompt_feedback_rating_failure_path() {
    let err = decode_response(&json!({
        "promptFeedback": {"safetyRatings": [{"probability": "LOW"}]}
    }))
    .unwrap_err();
    match err {
        DecodeError::LeafDecodeFailure { path, .. } => {
            assert_eq!(path, "promptFeedback.safetyRatings[0]");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =========================================================================
// String entry points & ResponseDecoder
// =========================================================================

#[test]
fn test_decode_response_str() {
    let response =
        decode_response_str(r#"{"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}"#)
            .unwrap();
    assert_eq!(response.text(), Some("hi"));

    let err = decode_response_str("{not json").unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::InvalidJson);
}

#[test]
fn test_decoder_with_payload_logging() {
    let decoder = ResponseDecoder::new(
        DecoderConfig::default()
            .with_log_payload_on_error(true)
            .with_preview_chars(8),
    );
    assert!(decoder.config().log_payload_on_error);

    let err = decoder.decode(&json!({"candidates": [{"content": {}}]})).unwrap_err();
    assert!(err.is_empty_content_bug());

    let err = decoder.decode_str("[").unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::InvalidJson);

    let response = decoder
        .decode_str(r#"{"promptFeedback": {"blockReason": 1}}"#)
        .unwrap();
    assert_eq!(response.block_reason(), Some(BlockReason::Safety));
}

#[test]
fn test_serde_deserialize_delegates_to_decoder() {
    let response: Response =
        serde_json::from_str(r#"{"candidates": [{"finishReason": 2}]}"#).unwrap();
    assert_eq!(response.finish_reason(), Some(FinishReason::MaxTokens));

    let err = serde_json::from_str::<Response>(r#"{"candidates": [{"content": {}}]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("empty content"));

    let err = serde_json::from_str::<Response>("{}").unwrap_err();
    assert!(err.to_string().contains("missing both"));
}

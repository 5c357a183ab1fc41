//! Decoding of captured service payloads.

mod common;

use common::fixture_json;
use common::fixture_text;
use genai_response::BlockReason;
use genai_response::DecodeErrorKind;
use genai_response::DecoderConfig;
use genai_response::FinishReason;
use genai_response::GenerateContentError;
use genai_response::HarmCategory;
use genai_response::HarmProbability;
use genai_response::Part;
use genai_response::ResponseDecoder;
use genai_response::SafetyRating;
use genai_response::WireEnum;
use genai_response::chunk::SseDecoder;
use genai_response::chunk::decode_event;
use genai_response::decode_response;
use pretty_assertions::assert_eq;

#[test]
fn text_response_decodes() {
    let response = decode_response(&fixture_json("text_response.json")).unwrap();

    assert_eq!(response.text(), Some("The capital of France is Paris."));
    assert_eq!(response.finish_reason(), Some(FinishReason::Stop));

    let candidate = &response.candidates[0];
    assert_eq!(candidate.safety_ratings.len(), 4);
    assert!(
        candidate
            .safety_ratings
            .iter()
            .all(|r| r.probability == HarmProbability::Negligible)
    );

    let citation = &candidate
        .citation_metadata
        .as_ref()
        .unwrap()
        .citation_sources[0];
    assert_eq!(citation.uri, "https://en.wikipedia.org/wiki/Paris");
    assert_eq!(
        citation.cited_text(response.text().unwrap()),
        Some("capital")
    );

    let feedback = response.prompt_feedback.as_ref().unwrap();
    assert_eq!(feedback.block_reason, None);
    assert_eq!(feedback.safety_ratings.len(), 2);
    assert!(response.check_outcome().is_ok());
}

#[test]
fn blocked_prompt_decodes_and_classifies() {
    let response = decode_response(&fixture_json("prompt_blocked.json")).unwrap();

    assert!(response.candidates.is_empty());
    assert_eq!(response.text(), None);
    assert_eq!(response.block_reason(), Some(BlockReason::Safety));
    assert_eq!(
        response.prompt_feedback.as_ref().unwrap().safety_ratings[1],
        SafetyRating::new(HarmCategory::HateSpeech, HarmProbability::High)
    );

    match response.check_outcome() {
        Err(GenerateContentError::PromptBlocked { reason, .. }) => {
            assert_eq!(reason, BlockReason::Safety);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn filtered_candidate_has_empty_content() {
    let response = decode_response(&fixture_json("filtered_candidate.json")).unwrap();

    let candidate = &response.candidates[0];
    assert!(candidate.content.is_empty());
    assert_eq!(candidate.finish_reason, Some(FinishReason::Safety));
    assert_eq!(response.text(), None);
    assert!(matches!(
        response.check_outcome(),
        Err(GenerateContentError::ResponseStoppedEarly {
            reason: FinishReason::Safety,
            ..
        })
    ));
}

#[test]
fn empty_content_object_is_reported_as_known_bug() {
    let decoder = ResponseDecoder::new(DecoderConfig::default().with_log_payload_on_error(true));
    let err = decoder
        .decode_str(&fixture_text("empty_content_bug.json"))
        .unwrap_err();

    assert_eq!(err.kind(), DecodeErrorKind::EmptyContentBug);
    assert_eq!(err.candidate_index(), Some(0));
}

#[test]
fn future_values_degrade_to_unknown() {
    let response = decode_response(&fixture_json("future_values.json")).unwrap();

    let candidate = &response.candidates[0];
    assert_eq!(candidate.finish_reason, Some(FinishReason::Unknown));
    assert!(candidate.safety_ratings[0].category.is_unknown());
    assert_eq!(
        candidate.content.parts,
        vec![Part::text("Done."), Part::default()]
    );
    assert_eq!(response.text(), Some("Done."));
    assert_eq!(response.block_reason(), Some(BlockReason::Unknown));
}

#[test]
fn stream_chunks_decode_individually() {
    let decoder = ResponseDecoder::default();
    let mut sse = SseDecoder::new();
    let raw = fixture_text("stream.sse");

    // Feed in small pieces to exercise line buffering.
    let mut events = Vec::new();
    for piece in raw.as_bytes().chunks(7) {
        events.extend(sse.decode_bytes(piece));
    }
    events.extend(sse.finish());

    let texts: Vec<String> = events
        .iter()
        .filter_map(|event| decode_event(&decoder, event).unwrap())
        .map(|response| response.text().unwrap_or_default().to_string())
        .collect();
    assert_eq!(texts, vec!["The capital", " of France", " is Paris."]);
}

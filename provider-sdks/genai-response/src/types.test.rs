use super::*;
use crate::decode::decode_response;
use pretty_assertions::assert_eq;
use serde_json::json;

fn preview_response() -> Response {
    Response::new(
        vec![
            Candidate::new(
                Content::with_parts(
                    "model",
                    vec![Part::text("Paris."), Part::inline("image/png", vec![0, 1, 2])],
                ),
                vec![SafetyRating::new(
                    HarmCategory::DangerousContent,
                    HarmProbability::Negligible,
                )],
                Some(FinishReason::Stop),
                Some(CitationMetadata {
                    citation_sources: vec![Citation {
                        start_index: 0,
                        end_index: 5,
                        uri: "https://example.com/paris".to_string(),
                        license: String::new(),
                    }],
                }),
            ),
            Candidate::new(Content::model("Lyon."), Vec::new(), None, None),
        ],
        Some(PromptFeedback::new(
            None,
            vec![SafetyRating::new(
                HarmCategory::Harassment,
                HarmProbability::Low,
            )],
        )),
    )
}

// =========================================================================
// text accessor
// =========================================================================

#[test]
fn test_text_from_first_candidate() {
    assert_eq!(preview_response().text(), Some("Paris."));
}

#[test]
fn test_text_without_candidates() {
    let response = Response::new(Vec::new(), Some(PromptFeedback::default()));
    assert_eq!(response.text(), None);
}

#[test]
fn test_text_with_zero_parts() {
    let response = Response::new(vec![Candidate::default()], None);
    assert_eq!(response.text(), None);
}

#[test]
fn test_text_when_first_part_has_no_text() {
    let response = Response::new(
        vec![Candidate::new(
            Content::with_parts(
                "model",
                vec![Part::inline("image/png", vec![1]), Part::text("later")],
            ),
            Vec::new(),
            None,
            None,
        )],
        None,
    );
    assert_eq!(response.text(), None);
}

#[test]
fn test_first_candidate_accessors() {
    let response = preview_response();
    assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
    assert_eq!(response.parts().map(<[Part]>::len), Some(2));
    assert_eq!(response.block_reason(), None);
    assert_eq!(Response::default().parts(), None);
}

// =========================================================================
// Round trip
// =========================================================================

#[test]
fn test_serialize_wire_shape() {
    let value = serde_json::to_value(preview_response()).unwrap();
    let first = &value["candidates"][0];
    assert_eq!(first["finishReason"], json!(1));
    assert_eq!(first["content"]["parts"][0], json!({"text": "Paris."}));
    assert_eq!(
        first["content"]["parts"][1],
        json!({"inlineData": {"mimeType": "image/png", "data": "AAEC"}})
    );
    assert_eq!(first["citationMetadata"]["citationSources"][0]["endIndex"], json!(5));
    assert_eq!(
        value["promptFeedback"]["safetyRatings"][0],
        json!({"category": "HARM_CATEGORY_HARASSMENT", "probability": "LOW"})
    );
    // Unset optionals are omitted.
    assert!(value["candidates"][1].get("finishReason").is_none());
    assert!(value["promptFeedback"].get("blockReason").is_none());
}

#[test]
fn test_round_trip() {
    let original = preview_response();
    let value = serde_json::to_value(&original).unwrap();
    assert_eq!(decode_response(&value).unwrap(), original);
}

#[test]
fn test_round_trip_blocked_prompt() {
    let original = Response::new(
        Vec::new(),
        Some(PromptFeedback::new(Some(BlockReason::Other), Vec::new())),
    );
    let text = serde_json::to_string(&original).unwrap();
    let decoded: Response = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_round_trip_unknown_enums() {
    let original = Response::new(
        vec![Candidate::new(
            Content::default(),
            vec![SafetyRating::new(HarmCategory::Unknown, HarmProbability::Unknown)],
            Some(FinishReason::Unknown),
            None,
        )],
        None,
    );
    let value = serde_json::to_value(&original).unwrap();
    assert_eq!(decode_response(&value).unwrap(), original);
}

// =========================================================================
// Leaves
// =========================================================================

#[test]
fn test_citation_span() {
    let citation = Citation {
        start_index: 2,
        end_index: 5,
        uri: "u".to_string(),
        license: "l".to_string(),
    };
    assert_eq!(citation.span(), Some(2..5));
    assert_eq!(citation.cited_text("a citation"), Some("cit"));
    assert_eq!(citation.cited_text("abc"), None);

    let negative = Citation {
        start_index: -1,
        ..citation.clone()
    };
    assert_eq!(negative.span(), None);

    let inverted = Citation {
        start_index: 5,
        end_index: 2,
        ..citation
    };
    assert_eq!(inverted.span(), None);
}

#[test]
fn test_blob_rejects_bad_base64() {
    let result: Result<Blob, _> =
        serde_json::from_value(json!({"mimeType": "image/png", "data": "***"}));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("base64 decode error"));
}

#[test]
fn test_part_from_str() {
    assert_eq!(Part::from("hi"), Part::text("hi"));
    assert_eq!(Part::from("hi".to_string()).text.as_deref(), Some("hi"));
}

#[test]
fn test_debug_summary() {
    let response = preview_response();
    assert_eq!(
        response.candidates[0].debug_summary(3),
        "finish=STOP, parts=[text(6 chars): \"Par\"..., inline_data(image/png, 3 bytes)]"
    );
    assert_eq!(
        Candidate::default().debug_summary(DEFAULT_PREVIEW_CHARS),
        "finish=none, parts=[no parts]"
    );
    let unknown = Candidate::new(
        Content::with_parts("model", vec![Part::default()]),
        Vec::new(),
        Some(FinishReason::Unknown),
        None,
    );
    assert_eq!(
        unknown.debug_summary(DEFAULT_PREVIEW_CHARS),
        "finish=UNKNOWN, parts=[unknown]"
    );
}

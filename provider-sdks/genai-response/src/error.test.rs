use super::*;
use serde::Deserialize;

fn json_error() -> serde_json::Error {
    serde_json::from_str::<serde_json::Value>("{").unwrap_err()
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Leaf {
    uri: String,
}

#[test]
fn test_kind_and_bug_check() {
    let bug = DecodeError::EmptyContentBug {
        index: 2,
        source: json_error(),
    };
    assert_eq!(bug.kind(), DecodeErrorKind::EmptyContentBug);
    assert!(bug.is_empty_content_bug());
    assert_eq!(bug.candidate_index(), Some(2));

    let malformed = DecodeError::MalformedContent {
        index: 0,
        source: json_error(),
    };
    assert_eq!(malformed.kind(), DecodeErrorKind::MalformedContent);
    assert!(!malformed.is_empty_content_bug());

    assert_eq!(
        DecodeError::MissingEnvelopeData.kind(),
        DecodeErrorKind::MissingEnvelopeData
    );
    assert_eq!(DecodeError::MissingEnvelopeData.candidate_index(), None);
}

#[test]
fn test_content_errors_keep_source() {
    let err = DecodeError::MalformedContent {
        index: 1,
        source: json_error(),
    };
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().starts_with("candidate 1 has malformed content"));
}

#[test]
fn test_leaf_path_joins_prefix() {
    let value = serde_json::json!([{ "uri": "a" }, { "uri": 7 }]);
    let err = serde_path_to_error::deserialize::<_, Vec<Leaf>>(&value).unwrap_err();
    let err = DecodeError::leaf("candidates[0].citationMetadata.citationSources", err);
    match err {
        DecodeError::LeafDecodeFailure { path, .. } => {
            assert_eq!(path, "candidates[0].citationMetadata.citationSources[1].uri");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_leaf_path_for_root_failure() {
    let value = serde_json::json!("not an object");
    let err = serde_path_to_error::deserialize::<_, Leaf>(&value).unwrap_err();
    let err = DecodeError::leaf("promptFeedback", err);
    assert_eq!(err.kind(), DecodeErrorKind::LeafDecodeFailure);
    assert!(err.to_string().starts_with("failed to decode `promptFeedback`"));
}

#[test]
fn test_invalid_json_from() {
    let err: DecodeError = json_error().into();
    assert_eq!(err.kind(), DecodeErrorKind::InvalidJson);
}

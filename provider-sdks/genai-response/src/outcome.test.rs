use super::*;
use crate::types::Candidate;
use crate::types::Content;
use crate::types::PromptFeedback;
use pretty_assertions::assert_eq;

fn with_finish(reason: Option<FinishReason>) -> Response {
    Response::new(
        vec![Candidate::new(Content::model("ok"), Vec::new(), reason, None)],
        None,
    )
}

#[test]
fn test_normal_finishes_pass() {
    for reason in [None, Some(FinishReason::Stop), Some(FinishReason::MaxTokens)] {
        let response = with_finish(reason);
        assert_eq!(response.clone().check_outcome(), Ok(response));
    }
}

#[test]
fn test_abnormal_finishes_stop_early() {
    for reason in [
        FinishReason::Safety,
        FinishReason::Recitation,
        FinishReason::Other,
        FinishReason::Unspecified,
        FinishReason::Unknown,
    ] {
        let err = with_finish(Some(reason)).check_outcome().unwrap_err();
        match &err {
            GenerateContentError::ResponseStoppedEarly { reason: got, .. } => {
                assert_eq!(*got, reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.response().text(), Some("ok"));
    }
}

#[test]
fn test_block_reason_wins() {
    let mut response = with_finish(Some(FinishReason::Safety));
    response.prompt_feedback = Some(PromptFeedback::new(Some(BlockReason::Safety), Vec::new()));
    let err = response.check_outcome().unwrap_err();
    assert!(matches!(
        err,
        GenerateContentError::PromptBlocked {
            reason: BlockReason::Safety,
            ..
        }
    ));
}

#[test]
fn test_feedback_without_block_reason_passes() {
    let response = Response::new(Vec::new(), Some(PromptFeedback::default()));
    assert!(response.check_outcome().is_ok());
}

#[test]
fn test_error_display() {
    let err = with_finish(Some(FinishReason::Recitation))
        .check_outcome()
        .unwrap_err();
    assert_eq!(err.to_string(), "response stopped early: Recitation");
}

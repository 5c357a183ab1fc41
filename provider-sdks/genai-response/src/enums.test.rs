use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn decode<T: WireEnum>(value: serde_json::Value) -> Result<T, serde_json::Error> {
    deserialize_fallback(&value)
}

#[test]
fn test_finish_reason_from_code() {
    assert_eq!(decode::<FinishReason>(json!(1)).unwrap(), FinishReason::Stop);
    assert_eq!(
        decode::<FinishReason>(json!(2)).unwrap(),
        FinishReason::MaxTokens
    );
    assert_eq!(
        decode::<FinishReason>(json!(0)).unwrap(),
        FinishReason::Unspecified
    );
}

#[test]
fn test_finish_reason_from_name() {
    assert_eq!(
        decode::<FinishReason>(json!("SAFETY")).unwrap(),
        FinishReason::Safety
    );
    assert_eq!(
        decode::<FinishReason>(json!("RECITATION")).unwrap(),
        FinishReason::Recitation
    );
}

#[test]
fn test_unrecognized_code_falls_back() {
    assert_eq!(
        decode::<FinishReason>(json!(99)).unwrap(),
        FinishReason::Unknown
    );
    assert_eq!(
        decode::<FinishReason>(json!(-7)).unwrap(),
        FinishReason::Unknown
    );
    assert_eq!(
        decode::<FinishReason>(json!(u64::MAX)).unwrap(),
        FinishReason::Unknown
    );
}

#[test]
fn test_unrecognized_name_falls_back() {
    assert_eq!(
        decode::<BlockReason>(json!("NEW_REASON")).unwrap(),
        BlockReason::Unknown
    );
    // Names are matched exactly.
    assert_eq!(
        decode::<BlockReason>(json!("safety")).unwrap(),
        BlockReason::Unknown
    );
}

#[test]
fn test_non_primitive_is_type_error() {
    assert!(decode::<FinishReason>(json!(true)).is_err());
    assert!(decode::<FinishReason>(json!(1.5)).is_err());
    assert!(decode::<BlockReason>(json!({"reason": "SAFETY"})).is_err());
    assert!(decode::<HarmCategory>(json!(null)).is_err());
}

#[test]
fn test_serialize_forms() {
    assert_eq!(serde_json::to_value(FinishReason::Stop).unwrap(), json!(1));
    assert_eq!(
        serde_json::to_value(BlockReason::Safety).unwrap(),
        json!("SAFETY")
    );
    assert_eq!(
        serde_json::to_value(HarmCategory::HateSpeech).unwrap(),
        json!("HARM_CATEGORY_HATE_SPEECH")
    );
    assert_eq!(
        serde_json::to_value(FinishReason::Unknown).unwrap(),
        json!(UNKNOWN_CODE)
    );
    assert_eq!(
        serde_json::to_value(BlockReason::Unknown).unwrap(),
        json!(UNKNOWN_NAME)
    );
}

#[test]
fn test_unknown_sentinel_decodes_to_unknown() {
    let value = serde_json::to_value(HarmProbability::Unknown).unwrap();
    assert_eq!(
        decode::<HarmProbability>(value).unwrap(),
        HarmProbability::Unknown
    );
    let value = serde_json::to_value(FinishReason::Unknown).unwrap();
    assert_eq!(decode::<FinishReason>(value).unwrap(), FinishReason::Unknown);
}

#[test]
fn test_every_variant_maps_both_ways() {
    for (variant, code, name) in HarmCategory::VARIANTS {
        assert_eq!(HarmCategory::from_code(*code), Some(*variant));
        assert_eq!(HarmCategory::from_name(name), Some(*variant));
        assert_eq!(variant.code(), *code);
        assert_eq!(variant.name(), *name);
        assert!(!variant.is_unknown());
    }
    assert!(HarmCategory::Unknown.is_unknown());
}

#[test]
fn test_display_uses_wire_name() {
    assert_eq!(FinishReason::MaxTokens.to_string(), "MAX_TOKENS");
    assert_eq!(HarmProbability::Unknown.to_string(), "UNKNOWN");
}

#[test]
fn test_derive_deserialize_via_serde_json() {
    let reasons: Vec<FinishReason> = serde_json::from_str(r#"[1, "STOP", 42]"#).unwrap();
    assert_eq!(
        reasons,
        vec![FinishReason::Stop, FinishReason::Stop, FinishReason::Unknown]
    );
}

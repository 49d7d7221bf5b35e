//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used by decode diagnostics.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.
use serde_json::Value;
use tzjson::api::{ErrorKind, ParseFailureCategory};
use tzjson::json::parse;

#[test]
fn category_mapping_handles_syntax_and_eof_errors() {
    let syntax_err = serde_json::from_str::<Value>(r#"{"a":}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&syntax_err),
        ParseFailureCategory::Syntax
    );

    let eof_err = serde_json::from_str::<Value>(r#"{"a":1"#).unwrap_err();
    assert_eq!(parse::categorize_error(&eof_err), ParseFailureCategory::Eof);
}

#[test]
fn category_mapping_handles_depth_and_range_messages() {
    let depth = 256usize;
    let payload = format!("{}0{}", "[".repeat(depth), "]".repeat(depth));
    let depth_err = serde_json::from_str::<Value>(&payload).unwrap_err();
    assert_eq!(
        parse::categorize_error(&depth_err),
        ParseFailureCategory::DepthLimit
    );

    assert_eq!(
        parse::categorize_message("number out of range at line 1 column 5"),
        ParseFailureCategory::NumericRange
    );
}

#[test]
fn decode_errors_carry_category_hint_and_position() {
    let err = parse::from_str(r#"{"a":}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.position(), Some((1, 6)));
    let hint = err.hint().expect("hint");
    assert!(hint.contains("parse category: syntax"));
    assert!(hint.contains("context: decode"));
}

#[test]
fn utf8_failures_are_categorized() {
    let err = parse::from_slice(&[0xff, 0xfe, b'{', b'}']).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.hint().expect("hint").contains("parse category: utf8"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        parse::categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
}

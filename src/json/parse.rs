//! Purpose: Decode JSON text into the generic `Value` tree.
//! Exports: `from_str`, `from_slice`, `ParseFailureCategory`, `categorize_error`,
//! `categorize_message`, `hint_for_error`.
//! Role: Parser boundary; serde_json tokenizes with order and exact numbers preserved.
//! Invariants: Decoding is generic only; no typed hook is ever applied here.
//! Invariants: Failures carry line/column and a stable category label, never partial values.
//! Notes: Duplicate keys keep their first position and take the last value.
//! Notes: Numbers keep serde_json's arbitrary-precision text (exact digits, exponent sign made explicit).
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::{Mapping, Number, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    Utf8,
    DepthLimit,
    NumericRange,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub fn from_str(input: &str) -> Result<Value, Error> {
    from_str_with_context(input, "decode")
}

pub fn from_slice(input: &[u8]) -> Result<Value, Error> {
    let text = std::str::from_utf8(input).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("input is not valid UTF-8")
            .with_hint(format!(
                "parse category: {}; context: decode",
                ParseFailureCategory::Utf8.label()
            ))
            .with_source(err)
    })?;
    from_str(text)
}

pub(crate) fn from_str_with_context(input: &str, context: &str) -> Result<Value, Error> {
    let raw: serde_json::Value = serde_json::from_str(input).map_err(|err| {
        debug!(context, category = categorize_error(&err).label(), "json decode failed");
        Error::new(ErrorKind::Parse)
            .with_message("malformed JSON")
            .with_position(err.line(), err.column())
            .with_hint(hint_for_error(&err, context))
            .with_source(err)
    })?;
    Ok(lift(raw))
}

fn lift(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(value) => Value::Bool(value),
        serde_json::Value::Number(number) => Value::Number(Number::from_lexeme(number.to_string())),
        serde_json::Value::String(text) => Value::Text(text),
        serde_json::Value::Array(items) => Value::Sequence(items.into_iter().map(lift).collect()),
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, lift(value)))
                .collect::<Mapping>(),
        ),
    }
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        serde_json::error::Category::Eof => ParseFailureCategory::Eof,
        serde_json::error::Category::Syntax => match categorize_message(&err.to_string()) {
            ParseFailureCategory::Unknown => ParseFailureCategory::Syntax,
            category => category,
        },
        serde_json::error::Category::Data | serde_json::error::Category::Io => {
            categorize_message(&err.to_string())
        }
    }
}

pub fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("recursion limit") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("number out of range") {
        ParseFailureCategory::NumericRange
    } else if lower.contains("utf-8") || lower.contains("unicode code point") {
        ParseFailureCategory::Utf8
    } else if lower.contains("eof while parsing") {
        ParseFailureCategory::Eof
    } else {
        ParseFailureCategory::Unknown
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    )
}

//! Purpose: In-memory tagged value tree produced by decoding and consumed by encoding.
//! Exports: `Value`, `Number`, `Mapping`.
//! Role: Replaces "any"-typed decode results; callers branch on the variant, never on runtime types.
//! Invariants: `Number` holds exact JSON number text (decoded text is serde_json-canonical); it is never rounded through f64.
//! Invariants: `Mapping` keeps insertion order and unique keys (re-insert replaces in place).
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::core::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    Timestamp(Timestamp),
}

impl Value {
    /// Stable lowercase name of the variant, used in diagnostics and the demo output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Field lookup on a mapping; `None` for other variants or a missing key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl fmt::Display for Value {
    /// Compact JSON; timestamps render as RFC 3339 text with their own offset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::json::write::to_display_string(self))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::from(i64::from(value)))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Number(number) => number.serialize(serializer),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Timestamp(ts) => serializer.collect_str(ts),
        }
    }
}

/// Exact decimal number, stored as JSON number text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Accepts a JSON number lexeme (`-?int(.frac)?(e[+-]?exp)?`).
    pub fn parse(lexeme: &str) -> Option<Self> {
        is_json_number(lexeme).then(|| Self(lexeme.to_string()))
    }

    /// Finite floats only; uses the shortest round-tripping representation.
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(|number| Self(number.to_string()))
    }

    pub(crate) fn from_lexeme(lexeme: String) -> Self {
        Self(lexeme)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_integer(&self) -> bool {
        !self.0.contains(['.', 'e', 'E'])
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Lossy for values outside f64 precision.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Integer fast path only when it reproduces the text; `-0` must stay `-0`.
        if let Some(value) = self.as_i64().filter(|value| value.to_string() == self.0) {
            return serializer.serialize_i64(value);
        }
        if let Some(value) = self.as_u64().filter(|value| value.to_string() == self.0) {
            return serializer.serialize_u64(value);
        }
        match self.0.parse::<serde_json::Number>() {
            Ok(number) => number.serialize(serializer),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

fn is_json_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if bytes.get(idx) == Some(&b'-') {
        idx += 1;
    }
    match bytes.get(idx) {
        Some(b'0') => idx += 1,
        Some(b'1'..=b'9') => {
            while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
                idx += 1;
            }
        }
        _ => return false,
    }
    if bytes.get(idx) == Some(&b'.') {
        idx += 1;
        let start = idx;
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        if idx == start {
            return false;
        }
    }
    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let start = idx;
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        if idx == start {
            return false;
        }
    }
    idx == bytes.len()
}

/// Insertion-ordered key/value pairs with unique keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Appends a new key, or replaces the value of an existing key in its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Mapping, Number, Value};

    #[test]
    fn number_lexeme_validation() {
        for ok in ["0", "-0", "47", "-122.039915", "1e309", "2.5E-3", "18446744073709551616"] {
            assert!(Number::parse(ok).is_some(), "{ok}");
        }
        for bad in ["", "-", "01", "1.", ".5", "1e", "+1", "NaN", "1.0x"] {
            assert!(Number::parse(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn number_accessors_are_exact() {
        let big = Number::parse("18446744073709551616").expect("big");
        assert_eq!(big.as_u64(), None);
        assert_eq!(big.as_str(), "18446744073709551616");

        let rev = Number::parse("47").expect("rev");
        assert_eq!(rev.as_i64(), Some(47));
        assert!(rev.is_integer());

        let lat = Number::parse("37.326555").expect("lat");
        assert_eq!(lat.as_i64(), None);
        assert_eq!(lat.as_f64(), Some(37.326555));
    }

    #[test]
    fn from_f64_rejects_non_finite() {
        assert_eq!(Number::from_f64(0.5).expect("half").as_str(), "0.5");
        assert_eq!(Number::from_f64(-122.039915).expect("lon").as_f64(), Some(-122.039915));
        assert_eq!(Number::from_f64(f64::NAN), None);
        assert_eq!(Number::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        let zero = Value::Number(Number::parse("-0").expect("-0"));
        assert_eq!(serde_json::to_string(&zero).expect("serialize"), "-0");
        assert_eq!(zero.to_string(), "-0");
        let plain = Value::Number(Number::parse("0").expect("0"));
        assert_eq!(serde_json::to_string(&plain).expect("serialize"), "0");
    }

    #[test]
    fn mapping_contains_key_sees_null_entries() {
        let map: Mapping = [("body", Value::Null)].into_iter().collect();
        assert!(map.contains_key("body"));
        assert!(!map.contains_key("name"));
    }

    #[test]
    fn mapping_insert_replaces_in_place() {
        let mut map = Mapping::new();
        map.insert("a", Value::from(1));
        map.insert("b", Value::from(2));
        let old = map.insert("a", Value::from(3));
        assert_eq!(old, Some(Value::from(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn mapping_remove_keeps_remaining_order() {
        let mut map: Mapping = [("x", Value::Null), ("y", Value::from(true)), ("z", Value::from("z"))]
            .into_iter()
            .collect();
        assert_eq!(map.remove("y"), Some(Value::from(true)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["x", "z"]);
        assert_eq!(map.remove("missing"), None);
    }

    #[test]
    fn kind_names_cover_every_variant() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::from(false).kind_name(), "bool");
        assert_eq!(Value::from(1).kind_name(), "number");
        assert_eq!(Value::from("s").kind_name(), "text");
        assert_eq!(Value::from(vec![1, 2]).kind_name(), "sequence");
        assert_eq!(Value::Mapping(Mapping::new()).kind_name(), "mapping");
    }

    #[test]
    fn serializes_through_serde_json() {
        let map: Mapping = [("b", Value::from(2)), ("a", Value::from(vec!["x"]))]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&Value::Mapping(map)).expect("serialize");
        assert_eq!(text, r#"{"b":2,"a":["x"]}"#);
    }
}

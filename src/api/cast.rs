//! Purpose: Explicit typed re-decode of values pulled out of a generic decode.
//! Exports: `FromValue`, `Value::cast`.
//! Role: Recovers native types from "any"-typed data by matching on the variant.
//! Invariants: No implicit coercion between variants except Text -> Timestamp re-parsing.
use crate::core::error::{Error, ErrorKind};
use crate::core::timestamp::Timestamp;
use crate::core::value::{Mapping, Value};

pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, Error>;
}

impl Value {
    /// Re-decodes this value as `T`, e.g. `decoded.get("rev")?.cast::<i64>()`.
    pub fn cast<T: FromValue>(&self) -> Result<T, Error> {
        T::from_value(self)
    }
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::new(ErrorKind::Shape).with_message(format!(
        "expected {expected}, found {}",
        found.kind_name()
    ))
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, Error> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, Error> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, Error> {
        let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
        number.as_i64().ok_or_else(|| {
            Error::new(ErrorKind::Shape)
                .with_message(format!("number {number} is not a 64-bit signed integer"))
        })
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, Error> {
        let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
        number.as_u64().ok_or_else(|| {
            Error::new(ErrorKind::Shape)
                .with_message(format!("number {number} is not a 64-bit unsigned integer"))
        })
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, Error> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|err| {
            Error::new(ErrorKind::Shape)
                .with_message(format!("number {wide} is out of range for i32"))
                .with_source(err)
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, Error> {
        let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
        number.as_f64().ok_or_else(|| {
            Error::new(ErrorKind::Shape).with_message(format!("number {number} is not finite as f64"))
        })
    }
}

impl FromValue for Timestamp {
    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(text) => Timestamp::parse(text),
            other => Err(mismatch("timestamp or text", other)),
        }
    }
}

impl FromValue for Mapping {
    fn from_value(value: &Value) -> Result<Self, Error> {
        value
            .as_mapping()
            .cloned()
            .ok_or_else(|| mismatch("mapping", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, Error> {
        let items = value
            .as_sequence()
            .ok_or_else(|| mismatch("sequence", value))?;
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| T::from_value(item).map_err(|err| err.with_field(format!("[{idx}]"))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::ErrorKind;
    use crate::core::timestamp::Timestamp;
    use crate::core::value::{Mapping, Value};
    use crate::json::parse::from_str;

    #[test]
    fn generic_number_needs_explicit_cast() {
        let decoded = from_str(r#"{"action":"reload","rev":47}"#).expect("decode");
        let rev = decoded.get("rev").expect("rev");
        assert!(matches!(rev, Value::Number(_)));
        assert_eq!(rev.cast::<i64>().expect("i64"), 47);
        assert_eq!(rev.cast::<u64>().expect("u64"), 47);
        assert_eq!(rev.cast::<i32>().expect("i32"), 47);
        assert_eq!(rev.cast::<String>().unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn sequence_of_values_casts_to_typed_list() {
        let decoded = from_str(r#"{"items":[{"key":"a"},{"key":"b"}],"nums":[1,2,3]}"#).expect("decode");
        let items = decoded.get("items").expect("items").cast::<Vec<Mapping>>().expect("items");
        let keys: Vec<String> = items
            .iter()
            .map(|item| item.get("key").expect("key").cast::<String>().expect("text"))
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(
            decoded.get("nums").expect("nums").cast::<Vec<i64>>().expect("nums"),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn list_cast_reports_failing_index() {
        let decoded = from_str(r#"[1,"two",3]"#).expect("decode");
        let err = decoded.cast::<Vec<i64>>().unwrap_err();
        assert_eq!(err.field(), Some("[1]"));
    }

    #[test]
    fn text_reparses_as_timestamp() {
        let decoded = from_str(r#"{"timestamp":"2019-04-17T15:53:22.369+09:00"}"#).expect("decode");
        let field = decoded.get("timestamp").expect("timestamp");
        assert!(matches!(field, Value::Text(_)));
        let ts = field.cast::<Timestamp>().expect("timestamp");
        assert_eq!(ts.offset().whole_hours(), 9);
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Value::Null.cast::<Option<i64>>().expect("none"), None);
        assert_eq!(Value::from(5).cast::<Option<i64>>().expect("some"), Some(5));
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let lat = from_str("37.326555").expect("decode");
        assert_eq!(lat.cast::<i64>().unwrap_err().kind(), ErrorKind::Shape);
        assert_eq!(lat.cast::<f64>().expect("f64"), 37.326555);
    }
}

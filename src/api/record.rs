//! Purpose: Fixed-shape event record with one hooked timestamp field and one opaque body.
//! Exports: `TypedRecord`.
//! Role: Typed view over `Codec::decode_record`/`encode_record` with the event shape.
//! Invariants: Wire shape is `{"name", "body", "createdAt"}`; `createdAt` is omitted when absent.
use std::fmt;

use crate::api::codec::{Codec, FieldSpec, RecordShape, TIMESTAMP_TAG};
use crate::core::error::{Error, ErrorKind};
use crate::core::timestamp::Timestamp;
use crate::core::value::{Mapping, Value};
use crate::json::write::EncodeOptions;

const NAME: &str = "name";
const BODY: &str = "body";
const CREATED_AT: &str = "createdAt";

#[derive(Clone, Debug, PartialEq)]
pub struct TypedRecord {
    pub name: String,
    pub body: Value,
    pub created_at: Option<Timestamp>,
}

impl TypedRecord {
    pub fn new(name: impl Into<String>, body: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn shape() -> RecordShape {
        RecordShape::new(vec![
            FieldSpec::required(NAME),
            FieldSpec::required(BODY),
            FieldSpec::optional(CREATED_AT).typed(TIMESTAMP_TAG),
        ])
    }

    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        map.insert(NAME, Value::from(self.name.as_str()));
        map.insert(BODY, self.body.clone());
        map.insert(CREATED_AT, Value::from(self.created_at));
        Value::Mapping(map)
    }

    /// Expects a document already passed through the record shape's decode hooks.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let name = match value.get(NAME) {
            Some(Value::Text(name)) => name.clone(),
            Some(other) => {
                return Err(Error::new(ErrorKind::Shape)
                    .with_message(format!("expected text, found {}", other.kind_name()))
                    .with_field(NAME));
            }
            None => {
                return Err(Error::new(ErrorKind::Shape)
                    .with_message("missing required field")
                    .with_field(NAME));
            }
        };
        let body = value.get(BODY).cloned().ok_or_else(|| {
            Error::new(ErrorKind::Shape)
                .with_message("missing required field")
                .with_field(BODY)
        })?;
        let created_at = match value.get(CREATED_AT) {
            None | Some(Value::Null) => None,
            Some(Value::Timestamp(ts)) => Some(*ts),
            Some(other) => {
                return Err(Error::new(ErrorKind::Shape)
                    .with_message(format!("expected timestamp, found {}", other.kind_name()))
                    .with_field(CREATED_AT));
            }
        };
        Ok(Self {
            name,
            body,
            created_at,
        })
    }

    pub fn decode(codec: &Codec, text: &str) -> Result<Self, Error> {
        let value = codec.decode_record(text, &Self::shape())?;
        Self::from_value(&value)
    }

    pub fn encode(&self, codec: &Codec, options: &EncodeOptions) -> Result<String, Error> {
        codec.encode_record(&self.to_value(), &Self::shape(), options)
    }
}

impl fmt::Display for TypedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedRecord(name={}, body={}, createdAt=", self.name, self.body)?;
        match &self.created_at {
            Some(ts) => write!(f, "{ts})"),
            None => f.write_str("null)"),
        }
    }
}

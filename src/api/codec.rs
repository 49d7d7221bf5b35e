//! Purpose: Frozen codec configuration: typed hook registry plus decode/encode entrypoints.
//! Exports: `Codec`, `CodecBuilder`, `TypedHook`, `TimestampHook`, `RecordShape`, `FieldSpec`,
//! `FieldKind`, `TIMESTAMP_TAG`.
//! Role: Explicit replacement for annotation-driven per-field serializers.
//! Invariants: Hooks are registered only through `CodecBuilder`; a built `Codec` is read-only.
//! Invariants: Generic `decode` never consults hooks; record operations apply them only to
//! fields declared `Typed` in the shape.
//! Invariants: Absent or null optional fields are omitted from record output.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::timestamp::{OffsetPolicy, Timestamp};
use crate::core::value::{Mapping, Value};
use crate::json::parse;
use crate::json::write::{self, EncodeOptions, TimestampMode};

pub const TIMESTAMP_TAG: &str = "timestamp";

/// Paired conversion for one semantic type tag.
pub trait TypedHook: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String, Error>;
    fn decode(&self, text: &str) -> Result<Value, Error>;
}

/// RFC 3339 timestamps with an explicit offset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimestampHook {
    policy: OffsetPolicy,
}

impl TimestampHook {
    pub fn new(policy: OffsetPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OffsetPolicy {
        self.policy
    }
}

impl TypedHook for TimestampHook {
    fn encode(&self, value: &Value) -> Result<String, Error> {
        match value {
            Value::Timestamp(ts) => ts.format(self.policy),
            other => Err(Error::new(ErrorKind::Encode).with_message(format!(
                "timestamp hook cannot encode a {} value",
                other.kind_name()
            ))),
        }
    }

    fn decode(&self, text: &str) -> Result<Value, Error> {
        Timestamp::parse(text).map(Value::Timestamp)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Generic,
    Typed(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Generic,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    pub fn typed(mut self, tag: impl Into<String>) -> Self {
        self.kind = FieldKind::Typed(tag.into());
        self
    }
}

/// Declared fields of a record document. Undeclared fields pass through generically.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecordShape {
    fields: Vec<FieldSpec>,
}

impl RecordShape {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

pub struct CodecBuilder {
    hooks: BTreeMap<String, Arc<dyn TypedHook>>,
}

impl CodecBuilder {
    /// Empty registry; no tag has a conversion until one is registered.
    pub fn new() -> Self {
        Self {
            hooks: BTreeMap::new(),
        }
    }

    pub fn register(mut self, tag: impl Into<String>, hook: impl TypedHook + 'static) -> Self {
        self.hooks.insert(tag.into(), Arc::new(hook));
        self
    }

    pub fn with_timestamp_hook(self, policy: OffsetPolicy) -> Self {
        self.register(TIMESTAMP_TAG, TimestampHook::new(policy))
    }

    pub fn build(self) -> Codec {
        debug!(tags = ?self.hooks.keys().collect::<Vec<_>>(), "codec built");
        Codec { hooks: self.hooks }
    }
}

impl Default for CodecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct Codec {
    hooks: BTreeMap<String, Arc<dyn TypedHook>>,
}

impl Codec {
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// Process-wide default codec (offset-preserving timestamp hook), built on first use.
    pub fn shared() -> &'static Codec {
        static SHARED: OnceLock<Codec> = OnceLock::new();
        SHARED.get_or_init(Codec::default)
    }

    pub fn hook(&self, tag: &str) -> Option<&dyn TypedHook> {
        self.hooks.get(tag).map(|hook| hook.as_ref())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// Generic decode; timestamps and other typed data stay as plain `Value`s.
    pub fn decode(&self, text: &str) -> Result<Value, Error> {
        parse::from_str(text)
    }

    pub fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<String, Error> {
        let text = write::write_value(value, options, self.timestamp_mode())?;
        debug!(kind = value.kind_name(), bytes = text.len(), "encoded value");
        Ok(text)
    }

    pub fn decode_record(&self, text: &str, shape: &RecordShape) -> Result<Value, Error> {
        let value = parse::from_str_with_context(text, "record")?;
        self.apply_decode_hooks(value, shape)
    }

    /// Applies the shape's typed hooks to an already generically decoded document.
    pub fn apply_decode_hooks(&self, value: Value, shape: &RecordShape) -> Result<Value, Error> {
        let Value::Mapping(mut map) = value else {
            return Err(Error::new(ErrorKind::Shape).with_message(format!(
                "record must be a mapping, found {}",
                value.kind_name()
            )));
        };
        for field in shape.fields() {
            // Required means the key is present; null is a legal value for it.
            let Some(current) = map.get(&field.name) else {
                if field.required {
                    return Err(missing_field(&field.name));
                }
                continue;
            };
            if current.is_null() {
                if !field.required {
                    map.remove(&field.name);
                }
                continue;
            }
            let FieldKind::Typed(tag) = &field.kind else {
                continue;
            };
            let hook = self.hook(tag).ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("no hook registered for tag {tag:?}"))
                    .with_field(&field.name)
            })?;
            let Some(slot) = map.get_mut(&field.name) else {
                return Err(Error::new(ErrorKind::Internal).with_message("field vanished"));
            };
            let decoded = match &*slot {
                Value::Text(raw) => {
                    debug!(field = %field.name, tag = %tag, "applying decode hook");
                    hook.decode(raw).map_err(|err| err.with_field(&field.name))?
                }
                other => {
                    return Err(Error::new(ErrorKind::Shape)
                        .with_message(format!(
                            "typed field expects a string, found {}",
                            other.kind_name()
                        ))
                        .with_field(&field.name));
                }
            };
            *slot = decoded;
        }
        Ok(Value::Mapping(map))
    }

    pub fn encode_record(
        &self,
        value: &Value,
        shape: &RecordShape,
        options: &EncodeOptions,
    ) -> Result<String, Error> {
        let Some(map) = value.as_mapping() else {
            return Err(Error::new(ErrorKind::Shape).with_message(format!(
                "record must be a mapping, found {}",
                value.kind_name()
            )));
        };
        if let Some(field) = shape
            .fields()
            .iter()
            .find(|field| field.required && !map.contains_key(&field.name))
        {
            return Err(missing_field(&field.name));
        }
        let mut out = Mapping::new();
        for (key, item) in map.iter() {
            match (shape.field(key), item) {
                (Some(field), Value::Null) if !field.required => {}
                (
                    Some(FieldSpec {
                        kind: FieldKind::Typed(tag),
                        ..
                    }),
                    item,
                ) if !item.is_null() => {
                    let hook = self.hook(tag).ok_or_else(|| {
                        Error::new(ErrorKind::Encode)
                            .with_message(format!("no conversion registered for tag {tag:?}"))
                            .with_field(key)
                    })?;
                    debug!(field = key, tag = %tag, "applying encode hook");
                    let text = hook.encode(item).map_err(|err| err.with_field(key))?;
                    out.insert(key, Value::Text(text));
                }
                (_, item) => {
                    out.insert(key, item.clone());
                }
            }
        }
        self.encode(&Value::Mapping(out), options)
    }

    fn timestamp_mode(&self) -> TimestampMode<'_> {
        match self.hook(TIMESTAMP_TAG) {
            Some(hook) => TimestampMode::Hook(hook),
            None => TimestampMode::Missing,
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        CodecBuilder::new()
            .with_timestamp_hook(OffsetPolicy::Preserve)
            .build()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

fn missing_field(name: &str) -> Error {
    Error::new(ErrorKind::Shape)
        .with_message("missing required field")
        .with_field(name)
}

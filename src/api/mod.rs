//! Purpose: Define the public Rust API boundary for the value codec.
//! Exports: Codec construction, hooks, record shapes, typed records, casts, and errors.
//! Role: Public, additive-only surface used by the demo binary and integration tests.
//! Invariants: Hook registration is only reachable through `CodecBuilder`.

mod cast;
mod codec;
mod record;

pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::timestamp::{OffsetPolicy, Timestamp};
pub use crate::core::value::{Mapping, Number, Value};
pub use crate::json::parse::ParseFailureCategory;
pub use crate::json::write::EncodeOptions;
pub use cast::FromValue;
pub use codec::{
    Codec, CodecBuilder, FieldKind, FieldSpec, RecordShape, TIMESTAMP_TAG, TimestampHook,
    TypedHook,
};
pub use record::TypedRecord;

//! Purpose: Structured value codec with per-field typed hooks and offset-preserving timestamps.
//! Exports: `api` (codec, records, casts, errors), `core` (value model), `json` (text boundary).
//! Role: Library backing the `tzjson` demo binary and integration tests.
//! Invariants: Codec configuration is built once and only read afterwards.
//! Invariants: Generic decoding never applies typed hooks; typed fields are declared explicitly.
pub mod api;
pub mod core;
pub mod json;

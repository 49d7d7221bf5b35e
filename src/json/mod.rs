//! Purpose: JSON text boundary for the value codec.
//! Exports: `parse` (text -> `Value`) and `write` (`Value` -> text).
//! Role: Single seam for tokenizing and rendering so callsites avoid ad hoc JSON handling.
//! Invariants: Neither module applies typed hooks on its own; callers pass them in explicitly.

pub mod parse;
pub mod write;

//! Binary format decoding modules.
//!
//! Each format follows a layered structure:
//! - `layout`: shapes, byte sizes and crop windows (source of truth)
//! - `reader`: bounds-checked byte access and sample conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; the `source` module owns file access.

pub mod dml;

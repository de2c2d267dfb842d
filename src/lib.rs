//! Public library API for decoding Kotlin/Native heap objects from a
//! running process.

/// Header classification, type metadata, subtype testing, and per-shape
/// object decoders.
pub mod heap;

//! # Serialization Framework
//!
//! Lifts FerryDB's data structures into and out of flat byte buffers.
//!
//! - `buffer`: move-only owner or borrowed view over a contiguous region
//! - `contract`: the `Serializable`/`Deserializable` capability pair with
//!   built-in impls for fixed-width numerics and strings
//! - `cursor`: bounds-checked little-endian readers and writers

pub mod buffer;
pub mod contract;
pub mod cursor;

pub use buffer::SerializedBuffer;
pub use contract::{Deserializable, Serializable};
pub use cursor::{ByteReader, ByteWriter};

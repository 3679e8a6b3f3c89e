// FerryDB - Embedded store persisting typed, namespaced data structures
// to memory-mapped files
// Core library module

pub mod common;
pub mod error;
pub mod graph;
pub mod serial;
pub mod storage;
pub mod table;

pub use error::{FerryError, Result};
pub use serial::{Deserializable, Serializable, SerializedBuffer};
pub use storage::ObjectManager;

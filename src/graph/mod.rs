//! # Weighted Directed Graph
//!
//! A graph keyed by user-supplied vertex identifiers, with a binary codec
//! that lays it out as four cross-referenced regions and round-trips it
//! through any byte buffer, including memory that another process may map.
//!
//! ## Architecture
//!
//! - `descriptor`: magic numbers, layout version, and the fixed-size region
//!   headers of the on-disk format
//! - `single_graph`: the in-memory structure and its mutation/query
//!   operations, built on the external-id -> slot -> payload indirection
//! - `codec`: the `Serializable`/`Deserializable` implementation
//! - `namespace`: string-named collections of independent graphs

pub mod codec;
pub mod descriptor;
pub mod namespace;
pub mod single_graph;

pub use descriptor::{
    Edge, EdgeHeader, GraphHeader, IdMapHeader, VertexHeader, GRAPH_LAYOUT_VERSION,
    WEIGHTED_GRAPH_MAGIC,
};
pub use namespace::Namespaces;
pub use single_graph::{SingleGraph, VertexRecord};

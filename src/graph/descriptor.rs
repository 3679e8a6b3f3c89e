// # Graph On-Disk Descriptors
//
// The structural preamble of every serialized graph: magic number, layout
// version, and the fixed-size headers that front each region. All fields
// are 8-byte little-endian integers except the id-map entry slot, which is
// 4 bytes to keep that index compact.

use crate::common::{EdgeSlot, VertexSlot};
use crate::error::{FerryError, Result};
use crate::serial::cursor::{ByteReader, ByteWriter};
use serde::{Deserialize, Serialize};

/// Identifies a weighted-graph object on disk.
pub const WEIGHTED_GRAPH_MAGIC: u64 = 0x5747_5248;

/// Current graph layout version.
pub const GRAPH_LAYOUT_VERSION: u64 = 1;

// ============================================================================
// Region Headers
// ============================================================================

/// Fixed preamble of a serialized graph.
///
/// Written last during encode, once the edge- and id-map-region offsets are
/// known; `vertex_offset` always equals `GraphHeader::SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphHeader {
    pub magic: u64,
    pub version: u64,
    pub vertex_count: u64,
    pub vertex_offset: u64,
    pub edge_count: u64,
    pub edge_offset: u64,
    pub id_map_offset: u64,
}

impl GraphHeader {
    pub const SIZE: usize = 56;

    pub fn write_to(&self, writer: &mut ByteWriter<'_>) -> Result<()> {
        writer.put_u64(self.magic)?;
        writer.put_u64(self.version)?;
        writer.put_u64(self.vertex_count)?;
        writer.put_u64(self.vertex_offset)?;
        writer.put_u64(self.edge_count)?;
        writer.put_u64(self.edge_offset)?;
        writer.put_u64(self.id_map_offset)
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            magic: reader.get_u64()?,
            version: reader.get_u64()?,
            vertex_count: reader.get_u64()?,
            vertex_offset: reader.get_u64()?,
            edge_count: reader.get_u64()?,
            edge_offset: reader.get_u64()?,
            id_map_offset: reader.get_u64()?,
        })
    }

    /// Reject buffers that do not front a weighted graph of a known layout.
    pub fn validate(&self) -> Result<()> {
        if self.magic != WEIGHTED_GRAPH_MAGIC {
            return Err(FerryError::corrupted(format!(
                "magic number {:#x} does not identify a weighted graph",
                self.magic
            )));
        }
        if self.version != GRAPH_LAYOUT_VERSION {
            return Err(FerryError::corrupted(format!(
                "unknown graph layout version {}",
                self.version
            )));
        }
        if self.vertex_offset != Self::SIZE as u64 {
            return Err(FerryError::corrupted(format!(
                "vertex region offset {} does not follow the header",
                self.vertex_offset
            )));
        }
        Ok(())
    }
}

/// Per-vertex entry header. `id_offset` and `data_offset` are relative to
/// the start of the entry; the id's byte length is their difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexHeader {
    pub slot: u64,
    pub id_offset: u64,
    pub data_offset: u64,
    pub data_size: u64,
}

impl VertexHeader {
    pub const SIZE: usize = 32;

    pub fn write_to(&self, writer: &mut ByteWriter<'_>) -> Result<()> {
        writer.put_u64(self.slot)?;
        writer.put_u64(self.id_offset)?;
        writer.put_u64(self.data_offset)?;
        writer.put_u64(self.data_size)
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self> {
        let header = Self {
            slot: reader.get_u64()?,
            id_offset: reader.get_u64()?,
            data_offset: reader.get_u64()?,
            data_size: reader.get_u64()?,
        };
        if header.id_offset != Self::SIZE as u64 || header.data_offset < header.id_offset {
            return Err(FerryError::corrupted(format!(
                "vertex {} carries inconsistent field offsets",
                header.slot
            )));
        }
        Ok(header)
    }

    /// Byte length of the id field implied by the offsets.
    pub fn id_size(&self) -> usize {
        (self.data_offset - self.id_offset) as usize
    }
}

/// Per-edge entry header. Field offsets are relative to the entry start;
/// source and destination slots are fixed-width, the weight is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeHeader {
    pub slot: u64,
    pub source_offset: u64,
    pub dest_offset: u64,
    pub weight_offset: u64,
    pub weight_size: u64,
}

impl EdgeHeader {
    pub const SIZE: usize = 40;

    /// Fixed span of the two endpoint slots that follow the header.
    pub const ENDPOINT_SIZE: usize = 16;

    pub fn write_to(&self, writer: &mut ByteWriter<'_>) -> Result<()> {
        writer.put_u64(self.slot)?;
        writer.put_u64(self.source_offset)?;
        writer.put_u64(self.dest_offset)?;
        writer.put_u64(self.weight_offset)?;
        writer.put_u64(self.weight_size)
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self> {
        let header = Self {
            slot: reader.get_u64()?,
            source_offset: reader.get_u64()?,
            dest_offset: reader.get_u64()?,
            weight_offset: reader.get_u64()?,
            weight_size: reader.get_u64()?,
        };
        let expected_source = Self::SIZE as u64;
        if header.source_offset != expected_source
            || header.dest_offset != expected_source + 8
            || header.weight_offset != expected_source + 16
        {
            return Err(FerryError::corrupted(format!(
                "edge {} carries inconsistent field offsets",
                header.slot
            )));
        }
        Ok(header)
    }
}

/// Header of the id-map region: the byte length of the mapping payload that
/// follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMapHeader {
    pub payload_len: u64,
}

impl IdMapHeader {
    pub const SIZE: usize = 8;

    /// Fixed bytes per mapping entry beyond the id itself: a 4-byte slot,
    /// an 8-byte absolute payload offset, an 8-byte payload size.
    pub const ENTRY_FIXED_SIZE: usize = 20;

    pub fn write_to(&self, writer: &mut ByteWriter<'_>) -> Result<()> {
        writer.put_u64(self.payload_len)
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            payload_len: reader.get_u64()?,
        })
    }
}

// ============================================================================
// Edge Record
// ============================================================================

/// A directed, weighted edge between two internal vertex slots.
///
/// Identity within an adjacency set is the `(source, dest)` pair; the slot
/// and weight belong to the first successful insertion unless updated.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<W> {
    pub slot: EdgeSlot,
    pub source: VertexSlot,
    pub dest: VertexSlot,
    pub weight: W,
}

impl<W> Edge<W> {
    pub fn new(slot: EdgeSlot, source: VertexSlot, dest: VertexSlot, weight: W) -> Self {
        Self {
            slot,
            source,
            dest,
            weight,
        }
    }
}

// # Graph Binary Codec
//
// Lays a single graph out as four regions:
//
// ```text
// [ GraphHeader ] [ VertexRegion ] [ EdgeRegion ] [ IdMapRegion ]
// ```
//
// The header is backfilled last, once the edge- and id-map-region offsets
// are known. The id-map region is redundant with the vertex region; it is
// an index for readers that want random access to a vertex payload without
// scanning, and decoding only validates its length.

use crate::common::VertexSlot;
use crate::error::{FerryError, Result};
use crate::graph::descriptor::{
    Edge, EdgeHeader, GraphHeader, IdMapHeader, VertexHeader, GRAPH_LAYOUT_VERSION,
    WEIGHTED_GRAPH_MAGIC,
};
use crate::graph::single_graph::{SingleGraph, VertexRecord};
use crate::serial::buffer::SerializedBuffer;
use crate::serial::contract::{Deserializable, Serializable};
use crate::serial::cursor::{ByteReader, ByteWriter};
use std::collections::HashMap;
use std::hash::Hash;

struct IdMapEntry {
    id_bytes: SerializedBuffer<'static>,
    slot: VertexSlot,
    payload_offset: u64,
    payload_size: u64,
}

impl<Id, Data, W> Serializable for SingleGraph<Id, Data, W>
where
    Id: Serializable,
    Data: Serializable,
    W: Serializable,
{
    fn serialized_size(&self) -> usize {
        let vertex_region: usize = self
            .slots
            .values()
            .map(|record| {
                VertexHeader::SIZE + record.id.serialized_size() + record.data.serialized_size()
            })
            .sum();
        let edge_region: usize = self
            .adjacency
            .values()
            .flat_map(|edges| edges.values())
            .map(|edge| {
                EdgeHeader::SIZE + EdgeHeader::ENDPOINT_SIZE + edge.weight.serialized_size()
            })
            .sum();
        let id_map_payload: usize = self
            .slots
            .values()
            .map(|record| record.id.serialized_size() + IdMapHeader::ENTRY_FIXED_SIZE)
            .sum();
        GraphHeader::SIZE + vertex_region + edge_region + IdMapHeader::SIZE + id_map_payload
    }

    fn serialize(&self) -> Result<SerializedBuffer<'static>> {
        let size = self.serialized_size();
        let mut block = vec![0u8; size];
        let mut writer = ByteWriter::new(&mut block);

        // Reserve the header slot; everything it needs to describe the
        // edge and id-map regions is only known after those are written.
        writer.set_position(GraphHeader::SIZE)?;

        let mut id_map = Vec::with_capacity(self.slots.len());
        for record in self.slots.values() {
            let entry_start = writer.position() as u64;
            let id_bytes = record.id.serialize()?;
            let data_bytes = record.data.serialize()?;

            let header = VertexHeader {
                slot: record.slot,
                id_offset: VertexHeader::SIZE as u64,
                data_offset: (VertexHeader::SIZE + id_bytes.len()) as u64,
                data_size: data_bytes.len() as u64,
            };
            header.write_to(&mut writer)?;
            writer.put_bytes(id_bytes.as_slice())?;
            writer.put_bytes(data_bytes.as_slice())?;

            if record.slot > u64::from(u32::MAX) {
                return Err(FerryError::encode_failed(
                    "vertex slot exceeds the id-map entry width",
                ));
            }
            id_map.push(IdMapEntry {
                payload_size: writer.position() as u64 - entry_start,
                id_bytes,
                slot: record.slot,
                payload_offset: entry_start,
            });
        }

        let edge_offset = writer.position() as u64;
        for edges in self.adjacency.values() {
            for edge in edges.values() {
                let weight_bytes = edge.weight.serialize()?;
                let header = EdgeHeader {
                    slot: edge.slot,
                    source_offset: EdgeHeader::SIZE as u64,
                    dest_offset: EdgeHeader::SIZE as u64 + 8,
                    weight_offset: EdgeHeader::SIZE as u64 + 16,
                    weight_size: weight_bytes.len() as u64,
                };
                header.write_to(&mut writer)?;
                writer.put_u64(edge.source)?;
                writer.put_u64(edge.dest)?;
                writer.put_bytes(weight_bytes.as_slice())?;
            }
        }

        let id_map_offset = writer.position() as u64;
        let payload_len: usize = id_map
            .iter()
            .map(|entry| entry.id_bytes.len() + IdMapHeader::ENTRY_FIXED_SIZE)
            .sum();
        IdMapHeader {
            payload_len: payload_len as u64,
        }
        .write_to(&mut writer)?;
        for entry in &id_map {
            writer.put_bytes(entry.id_bytes.as_slice())?;
            writer.put_u32(entry.slot as u32)?;
            writer.put_u64(entry.payload_offset)?;
            writer.put_u64(entry.payload_size)?;
        }

        // A nested codec that reports one length and writes another would
        // leave the cursor short of the sized buffer.
        if writer.position() != size {
            return Err(FerryError::encode_failed(format!(
                "encoded {} bytes where {} were sized",
                writer.position(),
                size
            )));
        }

        writer.set_position(0)?;
        GraphHeader {
            magic: WEIGHTED_GRAPH_MAGIC,
            version: GRAPH_LAYOUT_VERSION,
            vertex_count: self.slots.len() as u64,
            vertex_offset: GraphHeader::SIZE as u64,
            edge_count: self.edge_count as u64,
            edge_offset,
            id_map_offset,
        }
        .write_to(&mut writer)?;

        Ok(SerializedBuffer::from_vec(block))
    }
}

impl<Id, Data, W> Deserializable for SingleGraph<Id, Data, W>
where
    Id: Deserializable + Hash + Eq + Clone,
    Data: Deserializable,
    W: Deserializable,
{
    fn deserialize(buffer: &SerializedBuffer<'_>) -> Result<Self> {
        let bytes = buffer.as_slice();
        if bytes.is_empty() {
            return Err(FerryError::NoDeserializableData);
        }

        let mut reader = ByteReader::new(bytes);
        let header = GraphHeader::read_from(&mut reader)?;
        header.validate()?;

        let mut graph = SingleGraph::default();
        reader.set_position(header.vertex_offset as usize)?;
        for _ in 0..header.vertex_count {
            let vertex = VertexHeader::read_from(&mut reader)?;
            let id_bytes = reader.get_bytes(vertex.id_size())?;
            let data_bytes = reader.get_bytes(vertex.data_size as usize)?;

            let id = Id::deserialize(&SerializedBuffer::view(id_bytes))?;
            let data = Data::deserialize(&SerializedBuffer::view(data_bytes))?;

            if graph.slots.contains_key(&vertex.slot) || graph.index.contains_key(&id) {
                return Err(FerryError::corrupted(format!(
                    "vertex slot {} appears twice",
                    vertex.slot
                )));
            }
            graph.index.insert(id.clone(), vertex.slot);
            graph.slots.insert(
                vertex.slot,
                VertexRecord {
                    slot: vertex.slot,
                    id,
                    data,
                },
            );
        }
        if reader.position() as u64 != header.edge_offset {
            return Err(FerryError::corrupted(
                "vertex region does not end at the stated edge offset",
            ));
        }

        for _ in 0..header.edge_count {
            let edge = EdgeHeader::read_from(&mut reader)?;
            let source = reader.get_u64()?;
            let dest = reader.get_u64()?;
            let weight_bytes = reader.get_bytes(edge.weight_size as usize)?;
            let weight = W::deserialize(&SerializedBuffer::view(weight_bytes))?;

            if !graph.slots.contains_key(&source) || !graph.slots.contains_key(&dest) {
                return Err(FerryError::corrupted(format!(
                    "edge {} references a vertex slot outside the vertex region",
                    edge.slot
                )));
            }
            let edges = graph.adjacency.entry(source).or_insert_with(HashMap::new);
            if edges
                .insert(dest, Edge::new(edge.slot, source, dest, weight))
                .is_some()
            {
                return Err(FerryError::corrupted(format!(
                    "edge ({source}, {dest}) appears twice"
                )));
            }
            graph.edge_count += 1;
        }
        if reader.position() as u64 != header.id_map_offset {
            return Err(FerryError::corrupted(
                "edge region does not end at the stated id-map offset",
            ));
        }

        // The id map is redundant for reconstruction; validating its length
        // is enough to reject a truncated or padded buffer.
        let id_map = IdMapHeader::read_from(&mut reader)?;
        if id_map.payload_len as usize != reader.remaining() {
            return Err(FerryError::corrupted(format!(
                "id-map payload of {} bytes, {} remain in buffer",
                id_map.payload_len,
                reader.remaining()
            )));
        }

        graph.next_vertex_slot = graph.slots.keys().max().map_or(0, |max| max + 1);
        graph.next_edge_slot = graph
            .adjacency
            .values()
            .flat_map(|edges| edges.values())
            .map(|edge| edge.slot)
            .max()
            .map_or(0, |max| max + 1);

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> SingleGraph<i32, i32, i32> {
        let mut graph = SingleGraph::new();
        graph.add_node(1, 2).unwrap();
        graph.add_node(2, 400).unwrap();
        graph.add_node(3, 600).unwrap();
        graph.add_edge(&1, &2, 100).unwrap();
        graph.add_edge(&1, &3, 200).unwrap();
        graph
    }

    #[test]
    fn test_round_trip_identity() {
        let graph = sample_graph();
        let buffer = graph.serialize().unwrap();
        let loaded = SingleGraph::<i32, i32, i32>::deserialize(&buffer).unwrap();
        assert_eq!(loaded, graph);
        assert_eq!(loaded.node_count(), 3);
        assert_eq!(loaded.edge_count(), 2);
        assert_eq!(loaded.edge_weight(&1, &2).unwrap(), 100);
    }

    #[test]
    fn test_size_faithfulness() {
        let graph = sample_graph();
        let buffer = graph.serialize().unwrap();
        assert_eq!(buffer.len(), graph.serialized_size());
    }

    #[test]
    fn test_empty_graph_layout() {
        let graph: SingleGraph<u64, u64, u64> = SingleGraph::new();
        assert_eq!(
            graph.serialized_size(),
            GraphHeader::SIZE + IdMapHeader::SIZE
        );

        let buffer = graph.serialize().unwrap();
        assert_eq!(buffer.len(), 64);
        let loaded = SingleGraph::<u64, u64, u64>::deserialize(&buffer).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.edge_count(), 0);
    }

    #[test]
    fn test_string_ids_and_weights() {
        let mut graph: SingleGraph<String, u64, String> = SingleGraph::new();
        graph.add_node("alpha".to_string(), 10).unwrap();
        graph.add_node("beta".to_string(), 20).unwrap();
        graph.add_node("".to_string(), 30).unwrap();
        graph
            .add_edge(&"alpha".to_string(), &"beta".to_string(), "heavy".to_string())
            .unwrap();
        graph
            .add_edge(&"beta".to_string(), &"".to_string(), String::new())
            .unwrap();

        let buffer = graph.serialize().unwrap();
        assert_eq!(buffer.len(), graph.serialized_size());

        let loaded = SingleGraph::<String, u64, String>::deserialize(&buffer).unwrap();
        assert_eq!(loaded, graph);
        assert_eq!(
            loaded
                .edge_weight(&"alpha".to_string(), &"beta".to_string())
                .unwrap(),
            "heavy"
        );
        assert_eq!(*loaded.get(&"".to_string()).unwrap(), 30);
    }

    #[test]
    fn test_slots_renumber_but_ids_survive() {
        let mut graph = sample_graph();
        // Deleting and re-adding leaves a gap in the slot numbering; the
        // decoded graph must still compare equal on external identity.
        graph.delete_node(&2).unwrap();
        graph.add_node(2, 400).unwrap();
        graph.add_edge(&1, &2, 100).unwrap();

        let buffer = graph.serialize().unwrap();
        let loaded = SingleGraph::<i32, i32, i32>::deserialize(&buffer).unwrap();
        assert_eq!(loaded, graph);

        // A loaded graph keeps accepting inserts without slot collisions.
        let mut loaded = loaded;
        loaded.add_node(4, 800).unwrap();
        loaded.add_edge(&4, &1, 5).unwrap();
        assert_eq!(loaded.node_count(), 4);
    }

    #[test]
    fn test_magic_rejection() {
        let graph = sample_graph();
        let mut block = graph.serialize().unwrap().as_slice().to_vec();
        block[0] ^= 0xFF;
        let err = SingleGraph::<i32, i32, i32>::deserialize(&SerializedBuffer::from_vec(block))
            .unwrap_err();
        assert!(matches!(err, FerryError::DeserializableDataCorrupted(_)));
    }

    #[test]
    fn test_unknown_version_rejection() {
        let graph = sample_graph();
        let mut block = graph.serialize().unwrap().as_slice().to_vec();
        block[8] = 9;
        let err = SingleGraph::<i32, i32, i32>::deserialize(&SerializedBuffer::from_vec(block))
            .unwrap_err();
        assert!(matches!(err, FerryError::DeserializableDataCorrupted(_)));
    }

    #[test]
    fn test_truncation_by_one_byte() {
        let graph = sample_graph();
        let mut block = graph.serialize().unwrap().as_slice().to_vec();
        block.pop();
        let err = SingleGraph::<i32, i32, i32>::deserialize(&SerializedBuffer::from_vec(block))
            .unwrap_err();
        assert!(matches!(err, FerryError::DeserializableDataCorrupted(_)));
    }

    #[test]
    fn test_empty_buffer() {
        let empty = SerializedBuffer::new(0);
        let err = SingleGraph::<i32, i32, i32>::deserialize(&empty).unwrap_err();
        assert!(matches!(err, FerryError::NoDeserializableData));
    }

    #[test]
    fn test_decode_from_borrowed_view() {
        let graph = sample_graph();
        let owned = graph.serialize().unwrap();
        let view = SerializedBuffer::view(owned.as_slice());
        let loaded = SingleGraph::<i32, i32, i32>::deserialize(&view).unwrap();
        assert_eq!(loaded, graph);
    }
}

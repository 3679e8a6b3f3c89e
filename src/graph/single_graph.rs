// # Single-Namespace Weighted Graph
//
// A directed, weighted graph keyed by user-supplied vertex identifiers.
// The graph keeps a two-level mapping: external id -> dense internal slot,
// and slot -> payload record, with edges keyed by slot pairs. The slot
// exists so edges reference vertices through a compact fixed-width handle
// no matter how large the external id type is.

use crate::common::{EdgeSlot, VertexSlot};
use crate::error::{FerryError, Result};
use crate::graph::descriptor::Edge;
use std::collections::HashMap;
use std::hash::Hash;

/// Payload record stored at a vertex slot.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord<Id, Data> {
    pub slot: VertexSlot,
    pub id: Id,
    pub data: Data,
}

/// A directed, weighted graph over externally-identified vertices.
///
/// Internal slots are assigned monotonically on insertion and stay stable
/// for the life of the in-memory graph; they are renumbered by a save/load
/// cycle, so callers must key everything on the external ids.
#[derive(Debug, Clone)]
pub struct SingleGraph<Id, Data, W> {
    /// slot -> (slot, id, data) payload storage
    pub(crate) slots: HashMap<VertexSlot, VertexRecord<Id, Data>>,

    /// external id -> slot identity resolution
    pub(crate) index: HashMap<Id, VertexSlot>,

    /// source slot -> (dest slot -> edge); edge identity is the slot pair
    pub(crate) adjacency: HashMap<VertexSlot, HashMap<VertexSlot, Edge<W>>>,

    pub(crate) next_vertex_slot: VertexSlot,
    pub(crate) next_edge_slot: EdgeSlot,
    pub(crate) edge_count: usize,
}

impl<Id, Data, W> Default for SingleGraph<Id, Data, W> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            index: HashMap::new(),
            adjacency: HashMap::new(),
            next_vertex_slot: 0,
            next_edge_slot: 0,
            edge_count: 0,
        }
    }
}

impl<Id, Data, W> SingleGraph<Id, Data, W>
where
    Id: Hash + Eq + Clone,
    Data: Clone,
    W: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_node(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    /// Insert a vertex under a fresh internal slot.
    pub fn add_node(&mut self, id: Id, data: Data) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(FerryError::invalid_argument("vertex id already exists"));
        }
        let slot = self.next_vertex_slot;
        self.next_vertex_slot += 1;
        self.index.insert(id.clone(), slot);
        self.slots.insert(slot, VertexRecord { slot, id, data });
        Ok(())
    }

    pub fn get(&self, id: &Id) -> Result<&Data> {
        let slot = self.resolve(id)?;
        Ok(&self.slots[&slot].data)
    }

    /// Insert a directed edge. Both endpoints must exist. Re-inserting an
    /// existing `(from, to)` pair is idempotent: the first edge's slot and
    /// weight are kept.
    pub fn add_edge(&mut self, from: &Id, to: &Id, weight: W) -> Result<()> {
        let source = self.resolve_endpoint(from, "source")?;
        let dest = self.resolve_endpoint(to, "destination")?;

        let edges = self.adjacency.entry(source).or_default();
        if edges.contains_key(&dest) {
            return Ok(());
        }
        let slot = self.next_edge_slot;
        self.next_edge_slot += 1;
        edges.insert(dest, Edge::new(slot, source, dest, weight));
        self.edge_count += 1;
        Ok(())
    }

    pub fn update_weight(&mut self, from: &Id, to: &Id, new_weight: W) -> Result<()> {
        let source = self.resolve_endpoint(from, "source")?;
        let dest = self.resolve_endpoint(to, "destination")?;
        let edge = self
            .adjacency
            .get_mut(&source)
            .and_then(|edges| edges.get_mut(&dest))
            .ok_or_else(|| FerryError::invalid_argument("edge does not exist"))?;
        edge.weight = new_weight;
        Ok(())
    }

    pub fn edge_weight(&self, from: &Id, to: &Id) -> Result<W> {
        let source = self.resolve_endpoint(from, "source")?;
        let dest = self.resolve_endpoint(to, "destination")?;
        self.adjacency
            .get(&source)
            .and_then(|edges| edges.get(&dest))
            .map(|edge| edge.weight.clone())
            .ok_or_else(|| FerryError::invalid_argument("edge does not exist"))
    }

    /// All vertices reachable over one outgoing edge, as `(id, data)` pairs.
    pub fn outbound(&self, id: &Id) -> Result<Vec<(Id, Data)>> {
        let slot = self.resolve(id)?;
        let mut nodes = Vec::new();
        if let Some(edges) = self.adjacency.get(&slot) {
            for dest in edges.keys() {
                let record = &self.slots[dest];
                nodes.push((record.id.clone(), record.data.clone()));
            }
        }
        Ok(nodes)
    }

    /// All vertices with an edge into `id`, as `(id, data)` pairs.
    pub fn inbound(&self, id: &Id) -> Result<Vec<(Id, Data)>> {
        let slot = self.resolve(id)?;
        let mut nodes = Vec::new();
        for (source, edges) in &self.adjacency {
            if edges.contains_key(&slot) {
                let record = &self.slots[source];
                nodes.push((record.id.clone(), record.data.clone()));
            }
        }
        Ok(nodes)
    }

    /// Erase an edge from the live adjacency set.
    pub fn delete_edge(&mut self, from: &Id, to: &Id) -> Result<()> {
        let source = self.resolve_endpoint(from, "source")?;
        let dest = self.resolve_endpoint(to, "destination")?;
        let removed = self
            .adjacency
            .get_mut(&source)
            .and_then(|edges| edges.remove(&dest));
        match removed {
            Some(_) => {
                self.edge_count -= 1;
                Ok(())
            }
            None => Err(FerryError::invalid_argument("edge does not exist")),
        }
    }

    /// Remove a vertex together with every edge touching it.
    pub fn delete_node(&mut self, id: &Id) -> Result<()> {
        let slot = self.resolve(id)?;
        self.index.remove(id);
        self.slots.remove(&slot);

        if let Some(outgoing) = self.adjacency.remove(&slot) {
            self.edge_count -= outgoing.len();
        }
        for edges in self.adjacency.values_mut() {
            if edges.remove(&slot).is_some() {
                self.edge_count -= 1;
            }
        }
        Ok(())
    }

    fn resolve(&self, id: &Id) -> Result<VertexSlot> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FerryError::invalid_argument("vertex does not exist"))
    }

    fn resolve_endpoint(&self, id: &Id, role: &str) -> Result<VertexSlot> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FerryError::invalid_argument(format!("{role} vertex does not exist")))
    }
}

// Round-trip equality is identity-plus-payload: the same set of external ids
// with the same data, and the same set of (source-id, dest-id, weight)
// edges. Internal slot numbering is deliberately excluded.
impl<Id, Data, W> PartialEq for SingleGraph<Id, Data, W>
where
    Id: Hash + Eq + Clone,
    Data: PartialEq,
    W: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.index.len() != other.index.len() || self.edge_count != other.edge_count {
            return false;
        }
        for (id, slot) in &self.index {
            let Some(other_slot) = other.index.get(id) else {
                return false;
            };
            if self.slots[slot].data != other.slots[other_slot].data {
                return false;
            }
        }
        for edges in self.adjacency.values() {
            for edge in edges.values() {
                let source_id = &self.slots[&edge.source].id;
                let dest_id = &self.slots[&edge.dest].id;
                let matched = other
                    .index
                    .get(source_id)
                    .and_then(|s| other.adjacency.get(s))
                    .and_then(|edges| other.index.get(dest_id).and_then(|d| edges.get(d)))
                    .is_some_and(|other_edge| other_edge.weight == edge.weight);
                if !matched {
                    return false;
                }
            }
        }
        true
    }
}

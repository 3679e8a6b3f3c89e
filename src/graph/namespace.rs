// String-named collection of single graphs. The on-disk unit stays the
// single graph: a higher layer saves each namespace's graph to its own file
// through its own ObjectManager.

use crate::error::{FerryError, Result};
use crate::graph::single_graph::SingleGraph;
use std::collections::HashMap;
use std::hash::Hash;

/// Multiple independent graphs keyed by namespace name.
///
/// `add_node` creates the namespace on first use; every other operation
/// requires it to exist already.
#[derive(Debug, Clone, Default)]
pub struct Namespaces<Id, Data, W> {
    graphs: HashMap<String, SingleGraph<Id, Data, W>>,
}

impl<Id, Data, W> Namespaces<Id, Data, W>
where
    Id: Hash + Eq + Clone,
    Data: Clone,
    W: Clone,
{
    pub fn new() -> Self {
        Self {
            graphs: HashMap::new(),
        }
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.graphs.contains_key(namespace)
    }

    pub fn namespace_count(&self) -> usize {
        self.graphs.len()
    }

    /// Borrow a namespace's graph, e.g. to hand it to an ObjectManager.
    pub fn graph(&self, namespace: &str) -> Result<&SingleGraph<Id, Data, W>> {
        self.graphs
            .get(namespace)
            .ok_or_else(|| FerryError::NoNamespace(namespace.to_string()))
    }

    pub fn graph_mut(&mut self, namespace: &str) -> Result<&mut SingleGraph<Id, Data, W>> {
        self.graphs
            .get_mut(namespace)
            .ok_or_else(|| FerryError::NoNamespace(namespace.to_string()))
    }

    pub fn add_node(&mut self, namespace: &str, id: Id, data: Data) -> Result<()> {
        self.graphs
            .entry(namespace.to_string())
            .or_default()
            .add_node(id, data)
    }

    pub fn get(&self, namespace: &str, id: &Id) -> Result<&Data> {
        self.graph(namespace)?.get(id)
    }

    pub fn add_edge(&mut self, namespace: &str, from: &Id, to: &Id, weight: W) -> Result<()> {
        self.graph_mut(namespace)?.add_edge(from, to, weight)
    }

    pub fn update_weight(
        &mut self,
        namespace: &str,
        from: &Id,
        to: &Id,
        new_weight: W,
    ) -> Result<()> {
        self.graph_mut(namespace)?.update_weight(from, to, new_weight)
    }

    pub fn edge_weight(&self, namespace: &str, from: &Id, to: &Id) -> Result<W> {
        self.graph(namespace)?.edge_weight(from, to)
    }

    pub fn outbound(&self, namespace: &str, id: &Id) -> Result<Vec<(Id, Data)>> {
        self.graph(namespace)?.outbound(id)
    }

    pub fn inbound(&self, namespace: &str, id: &Id) -> Result<Vec<(Id, Data)>> {
        self.graph(namespace)?.inbound(id)
    }

    pub fn delete_edge(&mut self, namespace: &str, from: &Id, to: &Id) -> Result<()> {
        self.graph_mut(namespace)?.delete_edge(from, to)
    }

    pub fn delete_node(&mut self, namespace: &str, id: &Id) -> Result<()> {
        self.graph_mut(namespace)?.delete_node(id)
    }

    pub fn node_count(&self, namespace: &str) -> Result<usize> {
        Ok(self.graph(namespace)?.node_count())
    }

    /// Replace a namespace's graph wholesale, e.g. after loading one from a
    /// file. Creates the namespace if it is new.
    pub fn attach(&mut self, namespace: &str, graph: SingleGraph<Id, Data, W>) {
        self.graphs.insert(namespace.to_string(), graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_creates_namespace() {
        let mut spaces: Namespaces<i32, i32, i32> = Namespaces::new();
        assert!(!spaces.contains("people"));
        spaces.add_node("people", 1, 10).unwrap();
        assert!(spaces.contains("people"));
        assert_eq!(spaces.node_count("people").unwrap(), 1);
    }

    #[test]
    fn test_missing_namespace() {
        let mut spaces: Namespaces<i32, i32, i32> = Namespaces::new();
        spaces.add_node("a", 1, 1).unwrap();

        let err = spaces.add_edge("b", &1, &1, 5).unwrap_err();
        assert!(matches!(err, FerryError::NoNamespace(name) if name == "b"));
        assert!(spaces.node_count("b").is_err());
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let mut spaces: Namespaces<i32, i32, i32> = Namespaces::new();
        spaces.add_node("a", 1, 10).unwrap();
        spaces.add_node("b", 1, 99).unwrap();
        spaces.add_node("a", 2, 20).unwrap();
        spaces.add_edge("a", &1, &2, 7).unwrap();

        assert_eq!(*spaces.get("a", &1).unwrap(), 10);
        assert_eq!(*spaces.get("b", &1).unwrap(), 99);
        assert_eq!(spaces.edge_weight("a", &1, &2).unwrap(), 7);
        assert!(spaces.edge_weight("b", &1, &2).is_err());
    }

    #[test]
    fn test_attach_replaces_graph() {
        let mut spaces: Namespaces<i32, i32, i32> = Namespaces::new();
        spaces.add_node("a", 1, 10).unwrap();

        let mut replacement = SingleGraph::new();
        replacement.add_node(5, 50).unwrap();
        spaces.attach("a", replacement);

        assert!(spaces.get("a", &1).is_err());
        assert_eq!(*spaces.get("a", &5).unwrap(), 50);
    }
}

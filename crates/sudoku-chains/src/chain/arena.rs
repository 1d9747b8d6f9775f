//! Dense id assignment for nodes.
//!
//! Ids are handed out in discovery order starting at 0 and stay valid for the
//! arena's lifetime. Arenas are rebuilt per grid, never shared between grids.

use std::collections::HashMap;

use super::node::Node;
use crate::error::{AicError, Result};

/// Dense index of a node inside one [`NodeArena`].
pub type NodeId = usize;

/// Bidirectional `Node <-> NodeId` table with a hard capacity.
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    ids: HashMap<Node, NodeId>,
    capacity: usize,
}

impl NodeArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.min(4096)),
            ids: HashMap::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Id of `node`, registering it on first sight.
    pub fn get_or_create_id(&mut self, node: Node) -> Result<NodeId> {
        if let Some(&id) = self.ids.get(&node) {
            return Ok(id);
        }
        if self.nodes.len() >= self.capacity {
            return Err(AicError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = self.nodes.len();
        self.nodes.push(node);
        self.ids.insert(node, id);
        Ok(id)
    }

    /// Id of an already-registered node
    pub fn id_of(&self, node: &Node) -> Option<NodeId> {
        self.ids.get(node).copied()
    }

    /// Node behind an id issued by this arena.
    ///
    /// Panics on an id this arena never issued.
    pub fn resolve(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(id, node)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellSet;

    #[test]
    fn test_repeat_lookup_returns_first_id() {
        let mut arena = NodeArena::with_capacity(16);
        let a = arena.get_or_create_id(Node::sole(0, 1)).unwrap();
        let b = arena.get_or_create_id(Node::sole(1, 1)).unwrap();
        assert_ne!(a, b);
        assert_eq!(arena.get_or_create_id(Node::sole(0, 1)).unwrap(), a);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_bijection() {
        let mut arena = NodeArena::with_capacity(64);
        let nodes = [
            Node::sole(10, 3),
            Node::locked(3, [0, 1, 2].into_iter().collect()),
            Node::almost_locked_set(4, CellSet::single(5), CellSet::single(6)),
            Node::sole(10, 4),
        ];
        for node in nodes {
            let id = arena.get_or_create_id(node).unwrap();
            assert_eq!(*arena.resolve(id), node);
            assert_eq!(arena.id_of(&node), Some(id));
        }
        let ids: Vec<NodeId> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_capacity_is_fatal() {
        let mut arena = NodeArena::with_capacity(1);
        arena.get_or_create_id(Node::sole(0, 1)).unwrap();
        // Existing nodes still resolve at capacity
        assert!(arena.get_or_create_id(Node::sole(0, 1)).is_ok());
        assert_eq!(
            arena.get_or_create_id(Node::sole(0, 2)),
            Err(AicError::CapacityExceeded { capacity: 1 })
        );
    }
}

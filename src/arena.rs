use crate::{
    errors::NodeError,
    handle::Handle,
    node::{Direction, Node},
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Storage that owns every node; chains are formed by handle links between them.
///
/// The arena is not a list. It does not know how many chains it holds or how
/// long they are, and link operations never free storage. A node lives until
/// [`NodeArena::release`] is called on it.
#[derive(Debug)]
pub struct NodeArena<V> {
    nodes: HashMap<usize, Node<V>>,
    next_id: usize,
}

impl<V> Default for NodeArena<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NodeArena<V> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Create an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: HashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Number of live nodes in storage, across all chains.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Does the arena hold no nodes?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Does `h` name a live node?
    pub fn contains(&self, h: Handle) -> bool {
        self.nodes.contains_key(&h.0)
    }

    /// Create an isolated node holding `value`.
    pub fn create(&mut self, value: V) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, Node::new(value));
        Handle(id)
    }

    /// Get the value held by `h`.
    pub fn value(&self, h: Handle) -> Result<&V, NodeError> {
        self.node(h).map(|n| &n.value)
    }

    /// Get the value held by `h`, mutably.
    pub fn value_mut(&mut self, h: Handle) -> Result<&mut V, NodeError> {
        self.node_mut(h).map(|n| &mut n.value)
    }

    /// The neighbour to the right of `h`, if any.
    pub fn next(&self, h: Handle) -> Result<Option<Handle>, NodeError> {
        self.node(h).map(|n| n.next)
    }

    /// The neighbour to the left of `h`, if any.
    pub fn prev(&self, h: Handle) -> Result<Option<Handle>, NodeError> {
        self.node(h).map(|n| n.prev)
    }

    /// Insert `node` immediately to the right of `at`.
    ///
    /// `node` must not be linked elsewhere; this is not checked.
    ///
    /// ```text
    /// before: at --- old
    /// after:  at --- node --- old
    /// ```
    pub fn insert_after(&mut self, at: Handle, node: Handle) -> Result<(), NodeError> {
        self.require(node)?;
        let old_next = self.node(at)?.next;

        let inserted = self.node_mut(node)?;
        inserted.prev = Some(at);
        inserted.next = old_next;

        if let Some(n) = old_next.and_then(|h| self.nodes.get_mut(&h.0)) {
            n.prev = Some(node);
        }
        self.node_mut(at)?.next = Some(node);

        trace!(at = at.0, node = node.0, next = ?old_next.map(|h| h.0), "insert after");
        Ok(())
    }

    /// Insert `node` immediately to the left of `at`.
    ///
    /// `node` must not be linked elsewhere; this is not checked.
    ///
    /// ```text
    /// before: old --- at
    /// after:  old --- node --- at
    /// ```
    pub fn insert_before(&mut self, at: Handle, node: Handle) -> Result<(), NodeError> {
        self.require(node)?;
        let old_prev = self.node(at)?.prev;

        let inserted = self.node_mut(node)?;
        inserted.prev = old_prev;
        inserted.next = Some(at);

        if let Some(p) = old_prev.and_then(|h| self.nodes.get_mut(&h.0)) {
            p.next = Some(node);
        }
        self.node_mut(at)?.prev = Some(node);

        trace!(at = at.0, node = node.0, prev = ?old_prev.map(|h| h.0), "insert before");
        Ok(())
    }

    /// Remove `node` from its chain, bridging its neighbours.
    ///
    /// The node stays in storage as an isolated length-1 chain: both of its
    /// links are cleared. Deleting an isolated node does nothing.
    pub fn delete(&mut self, node: Handle) -> Result<(), NodeError> {
        let detached = self.node_mut(node)?;
        if detached.is_isolated() {
            return Ok(());
        }
        // A self-loop has no neighbours to bridge.
        let prev = detached.prev.take().filter(|&h| h != node);
        let next = detached.next.take().filter(|&h| h != node);

        if let Some(p) = prev.and_then(|h| self.nodes.get_mut(&h.0)) {
            p.next = next;
        }
        if let Some(n) = next.and_then(|h| self.nodes.get_mut(&h.0)) {
            n.prev = prev;
        }

        trace!(node = node.0, prev = ?prev.map(|h| h.0), next = ?next.map(|h| h.0), "delete");
        Ok(())
    }

    /// Link `left.next` to `right` and `right.prev` to `left`.
    ///
    /// Former neighbours are not touched, so this only keeps symmetry when
    /// `left` has no successor and `right` has no predecessor. Joining the
    /// tail of an open chain to its head closes it into a circle.
    pub fn join(&mut self, left: Handle, right: Handle) -> Result<(), NodeError> {
        self.require(left)?;
        self.require(right)?;
        self.node_mut(left)?.next = Some(right);
        self.node_mut(right)?.prev = Some(left);

        trace!(left = left.0, right = right.0, "join");
        Ok(())
    }

    /// Delete `h` from its chain and drop it from storage, returning its value.
    ///
    /// `h` is invalid afterwards.
    pub fn release(&mut self, h: Handle) -> Result<V, NodeError> {
        self.delete(h)?;
        let node = self.nodes.remove(&h.0).ok_or(NodeError::InvalidHandle(h))?;
        debug!(node = h.0, live = self.nodes.len(), "release");
        Ok(node.value)
    }

    /// The link of `h` in `direction`, provided it names a live node.
    pub(crate) fn follow(&self, h: Handle, direction: Direction) -> Option<Handle> {
        self.nodes
            .get(&h.0)
            .and_then(|n| n.link(direction))
            .filter(|l| self.nodes.contains_key(&l.0))
    }

    pub(crate) fn node(&self, h: Handle) -> Result<&Node<V>, NodeError> {
        self.nodes.get(&h.0).ok_or(NodeError::InvalidHandle(h))
    }

    fn node_mut(&mut self, h: Handle) -> Result<&mut Node<V>, NodeError> {
        self.nodes.get_mut(&h.0).ok_or(NodeError::InvalidHandle(h))
    }

    pub(crate) fn require(&self, h: Handle) -> Result<(), NodeError> {
        self.node(h).map(|_| ())
    }
}

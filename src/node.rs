use crate::handle::Handle;

#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) value: V,
    pub(crate) prev: Option<Handle>,
    pub(crate) next: Option<Handle>,
}

impl<V> Node<V> {
    pub(crate) fn new(value: V) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }

    /// Is this node a length-1 chain (no neighbours)?
    pub(crate) fn is_isolated(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }

    /// Link followed by a walk in `direction`.
    pub(crate) fn link(&self, direction: Direction) -> Option<Handle> {
        match direction {
            Direction::Forward => self.next,
            Direction::Backward => self.prev,
        }
    }
}

/// Which link a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Along `next`.
    Forward,
    /// Along `prev`.
    Backward,
}

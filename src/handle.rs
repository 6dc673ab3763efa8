/// Non-owning reference to a node stored in a [`NodeArena`](crate::NodeArena).
///
/// Handles are never reused, so a handle to a released node stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub(crate) usize);

impl Handle {
    /// Returns the raw numeric identifier for debugging or external maps.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

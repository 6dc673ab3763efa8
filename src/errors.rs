use thiserror::Error;

use crate::handle::Handle;

/// Errors that can occur when operating on nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The handle was never issued by this arena, or its node was released.
    #[error("invalid handle {}", .0.as_raw())]
    InvalidHandle(Handle),
}

//! Generic doubly linked nodes.
//!
//! Nodes live in a [`NodeArena`] and link to each other through [`Handle`]s.
//! The arena is plain storage: chains are whatever the links say they are,
//! open or circular, and there may be any number of them.
//!
//! ```
//! use nodechain::NodeArena;
//!
//! let mut arena = NodeArena::new();
//! let a = arena.create(0);
//! let b = arena.create(1);
//! arena.insert_after(a, b)?;
//!
//! let values: Vec<_> = arena.walk_forward(a)?.map(|(_, v)| *v).collect();
//! assert_eq!(values, [0, 1]);
//! assert_eq!(arena.tail(a)?, Some(b));
//! # Ok::<(), nodechain::NodeError>(())
//! ```
//!
//! No operation takes a lock. Sharing an arena across threads needs an
//! external one.
mod arena;
mod errors;
mod handle;
mod node;
mod traverse;

pub use arena::NodeArena;
pub use errors::NodeError;
pub use handle::Handle;
pub use traverse::Walk;

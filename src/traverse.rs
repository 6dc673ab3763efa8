use crate::{
    arena::NodeArena,
    errors::NodeError,
    handle::Handle,
    node::Direction,
};
use core::iter::FusedIterator;
use tracing::warn;

/// Lazy walk over a chain, yielding `(Handle, &V)`.
///
/// The start node is yielded first. The walk ends at a missing link, or just
/// before it would come back around to the start node in a circular chain.
/// It is also capped at the number of nodes in the arena, which only matters
/// for graphs whose links were corrupted by misuse.
pub struct Walk<'a, V> {
    arena: &'a NodeArena<V>,
    start: Handle,
    cursor: Option<Handle>,
    direction: Direction,
    remaining: usize,
}

/// Where a walk towards a boundary stopped.
enum Seek {
    Boundary(Handle),
    Closed,
    Unbounded,
}

impl<V> NodeArena<V> {
    /// Walk from `start` along `next` links.
    pub fn walk_forward(&self, start: Handle) -> Result<Walk<'_, V>, NodeError> {
        self.walk(start, Direction::Forward)
    }

    /// Walk from `start` along `prev` links.
    pub fn walk_backward(&self, start: Handle) -> Result<Walk<'_, V>, NodeError> {
        self.walk(start, Direction::Backward)
    }

    /// Invoke `visitor` on `start` and every node to its right until it returns `false`.
    ///
    /// In a circular chain each node is visited once.
    pub fn visit_forward<F>(&self, start: Handle, visitor: F) -> Result<(), NodeError>
    where
        F: FnMut(Handle, &V) -> bool,
    {
        Self::visit(self.walk_forward(start)?, visitor);
        Ok(())
    }

    /// Invoke `visitor` on `start` and every node to its left until it returns `false`.
    ///
    /// In a circular chain each node is visited once.
    pub fn visit_backward<F>(&self, start: Handle, visitor: F) -> Result<(), NodeError>
    where
        F: FnMut(Handle, &V) -> bool,
    {
        Self::visit(self.walk_backward(start)?, visitor);
        Ok(())
    }

    /// The leftmost node of the chain containing `start`.
    ///
    /// Runs in O(distance to head). `None` if the chain is circular.
    pub fn head(&self, start: Handle) -> Result<Option<Handle>, NodeError> {
        Ok(match self.seek(start, Direction::Backward)? {
            Seek::Boundary(h) => Some(h),
            Seek::Closed | Seek::Unbounded => None,
        })
    }

    /// The rightmost node of the chain containing `start`.
    ///
    /// Runs in O(distance to tail). `None` if the chain is circular.
    pub fn tail(&self, start: Handle) -> Result<Option<Handle>, NodeError> {
        Ok(match self.seek(start, Direction::Forward)? {
            Seek::Boundary(h) => Some(h),
            Seek::Closed | Seek::Unbounded => None,
        })
    }

    /// Does following `next` from `start` lead back to `start`?
    pub fn is_circular(&self, start: Handle) -> Result<bool, NodeError> {
        Ok(matches!(self.seek(start, Direction::Forward)?, Seek::Closed))
    }

    fn walk(&self, start: Handle, direction: Direction) -> Result<Walk<'_, V>, NodeError> {
        self.require(start)?;
        Ok(Walk {
            arena: self,
            start,
            cursor: Some(start),
            direction,
            remaining: self.len(),
        })
    }

    fn visit<F>(walk: Walk<'_, V>, mut visitor: F)
    where
        F: FnMut(Handle, &V) -> bool,
    {
        for (h, value) in walk {
            if !visitor(h, value) {
                break;
            }
        }
    }

    fn seek(&self, start: Handle, direction: Direction) -> Result<Seek, NodeError> {
        self.require(start)?;
        let mut cursor = start;
        for _ in 0..self.len() {
            match self.follow(cursor, direction) {
                None => return Ok(Seek::Boundary(cursor)),
                Some(h) if h == start => return Ok(Seek::Closed),
                Some(h) => cursor = h,
            }
        }
        warn!(start = start.0, ?direction, "chain neither ends nor returns to start");
        Ok(Seek::Unbounded)
    }
}

impl<'a, V> Iterator for Walk<'a, V> {
    type Item = (Handle, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.cursor.take()?;
        if self.remaining == 0 {
            warn!(start = self.start.0, direction = ?self.direction, "walk cut off at arena size");
            return None;
        }
        self.remaining -= 1;
        let node = self.arena.node(h).ok()?;
        self.cursor = self
            .arena
            .follow(h, self.direction)
            .filter(|&n| n != self.start);
        Some((h, &node.value))
    }
}

impl<V> FusedIterator for Walk<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(arena: &mut NodeArena<i32>, n: i32) -> Vec<Handle> {
        let handles: Vec<_> = (0..n).map(|i| arena.create(i)).collect();
        for pair in handles.windows(2) {
            arena.insert_after(pair[0], pair[1]).unwrap();
        }
        handles
    }

    fn forward(arena: &NodeArena<i32>, start: Handle) -> Vec<i32> {
        arena.walk_forward(start).unwrap().map(|(_, v)| *v).collect()
    }

    #[test]
    fn append_then_visit() {
        let mut arena = NodeArena::new();
        let start = arena.create(0);
        let mut n = start;
        for i in 1..5 {
            let next = arena.create(i);
            arena.insert_after(n, next).unwrap();
            n = next;
        }

        let mut expect = 0;
        arena
            .visit_forward(start, |_, v| {
                assert_eq!(*v, expect);
                expect += 1;
                true
            })
            .unwrap();
        assert_eq!(expect, 5);

        assert_eq!(arena.head(n).unwrap(), Some(start));
        assert_eq!(forward(&arena, arena.head(n).unwrap().unwrap()), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn prepend_then_visit() {
        let mut arena = NodeArena::new();
        let end = arena.create(0);
        let mut n = end;
        for i in 1..5 {
            let prev = arena.create(i);
            arena.insert_before(n, prev).unwrap();
            n = prev;
        }

        let mut seen = Vec::new();
        arena
            .visit_backward(end, |_, v| {
                seen.push(*v);
                true
            })
            .unwrap();
        assert_eq!(seen, [0, 1, 2, 3, 4]);

        let tail = arena.tail(n).unwrap().unwrap();
        assert_eq!(tail, end);
        let back: Vec<_> = arena.walk_backward(tail).unwrap().map(|(_, v)| *v).collect();
        assert_eq!(back, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn visitor_stops_early() {
        let mut arena = NodeArena::new();
        let h = chain(&mut arena, 4);
        let mut seen = Vec::new();
        arena
            .visit_forward(h[0], |_, v| {
                seen.push(*v);
                *v < 1
            })
            .unwrap();
        assert_eq!(seen, [0, 1]);
    }

    #[test]
    fn singleton_is_its_own_boundary() {
        let mut arena = NodeArena::new();
        let a = arena.create(3);
        assert_eq!(arena.head(a).unwrap(), Some(a));
        assert_eq!(arena.tail(a).unwrap(), Some(a));
        assert!(!arena.is_circular(a).unwrap());
        assert_eq!(forward(&arena, a), [3]);
    }

    #[test]
    fn circular_chain() {
        let mut arena = NodeArena::new();
        let h = chain(&mut arena, 5);
        assert!(!arena.is_circular(h[2]).unwrap());

        arena.join(h[4], h[0]).unwrap();
        for &start in &h {
            assert!(arena.is_circular(start).unwrap());
            assert_eq!(arena.head(start).unwrap(), None);
            assert_eq!(arena.tail(start).unwrap(), None);
        }

        assert_eq!(forward(&arena, h[2]), [2, 3, 4, 0, 1]);
        let back: Vec<_> = arena.walk_backward(h[2]).unwrap().map(|(_, v)| *v).collect();
        assert_eq!(back, [2, 1, 0, 4, 3]);

        let mut count = 0;
        arena
            .visit_forward(h[3], |_, _| {
                count += 1;
                true
            })
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn self_loop_is_circular() {
        let mut arena = NodeArena::new();
        let a = arena.create(1);
        arena.join(a, a).unwrap();
        assert!(arena.is_circular(a).unwrap());
        assert_eq!(arena.head(a).unwrap(), None);
        assert_eq!(forward(&arena, a), [1]);
    }

    #[test]
    fn walk_is_restartable() {
        let mut arena = NodeArena::new();
        let h = chain(&mut arena, 3);
        let mut walk = arena.walk_forward(h[0]).unwrap();
        assert_eq!(walk.next().map(|(_, v)| *v), Some(0));
        drop(walk);
        assert_eq!(forward(&arena, h[0]), [0, 1, 2]);
    }

    #[test]
    fn walk_yields_handles() {
        let mut arena = NodeArena::new();
        let h = chain(&mut arena, 3);
        let handles: Vec<_> = arena.walk_forward(h[0]).unwrap().map(|(h, _)| h).collect();
        assert_eq!(handles, h);
    }

    #[test]
    fn corrupted_rho_terminates() {
        // 0 -> 1 -> 2 -> 3 -> 1: the start is not on the cycle.
        let mut arena = NodeArena::new();
        let h = chain(&mut arena, 4);
        arena.join(h[3], h[1]).unwrap();

        assert!(!arena.is_circular(h[0]).unwrap());
        assert_eq!(arena.tail(h[0]).unwrap(), None);
        assert_eq!(forward(&arena, h[0]).len(), arena.len());
    }

    #[test]
    fn invalid_start_is_rejected() {
        let mut arena = NodeArena::new();
        let a = arena.create(1);
        arena.release(a).unwrap();
        assert_eq!(arena.head(a), Err(NodeError::InvalidHandle(a)));
        assert_eq!(arena.is_circular(a), Err(NodeError::InvalidHandle(a)));
        assert!(arena.walk_forward(a).is_err());
        assert!(arena.visit_backward(a, |_, _| true).is_err());
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn build(values: &[u8]) -> (NodeArena<u8>, Vec<Handle>) {
        let mut arena = NodeArena::with_capacity(values.len());
        let handles: Vec<_> = values.iter().map(|&v| arena.create(v)).collect();
        for pair in handles.windows(2) {
            arena.insert_after(pair[0], pair[1]).unwrap();
        }
        (arena, handles)
    }

    fn assert_symmetric(arena: &NodeArena<u8>, handles: &[Handle]) {
        for &h in handles {
            if let Some(n) = arena.next(h).unwrap() {
                assert_eq!(arena.prev(n).unwrap(), Some(h));
            }
            if let Some(p) = arena.prev(h).unwrap() {
                assert_eq!(arena.next(p).unwrap(), Some(h));
            }
        }
    }

    proptest! {
        #[test]
        fn append_order_round_trips(values in prop::collection::vec(any::<u8>(), 1..64)) {
            let (arena, handles) = build(&values);
            let first = handles[0];
            let last = *handles.last().unwrap();

            let fwd: Vec<_> = arena.walk_forward(first).unwrap().map(|(_, v)| *v).collect();
            prop_assert_eq!(&fwd, &values);

            let mut rev = values.clone();
            rev.reverse();
            let back: Vec<_> = arena.walk_backward(last).unwrap().map(|(_, v)| *v).collect();
            prop_assert_eq!(back, rev);

            prop_assert_eq!(arena.head(last).unwrap(), Some(first));
            prop_assert_eq!(arena.tail(first).unwrap(), Some(last));
        }

        #[test]
        fn delete_removes_exactly_one(len in 2usize..40, pick in any::<prop::sample::Index>()) {
            let values: Vec<u8> = (0..len as u8).collect();
            let (mut arena, handles) = build(&values);
            let i = pick.index(len);
            arena.delete(handles[i]).unwrap();

            let first = if i == 0 { handles[1] } else { handles[0] };
            let mut expect = values.clone();
            expect.remove(i);
            let fwd: Vec<_> = arena.walk_forward(first).unwrap().map(|(_, v)| *v).collect();
            prop_assert_eq!(fwd, expect);
            assert_symmetric(&arena, &handles);
        }

        #[test]
        fn random_inserts_keep_symmetry(ops in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 1..64)) {
            let mut arena = NodeArena::new();
            let mut handles = vec![arena.create(0u8)];
            for (i, (after, at)) in ops.iter().enumerate() {
                let at = handles[at.index(handles.len())];
                let node = arena.create(i as u8);
                if *after {
                    arena.insert_after(at, node).unwrap();
                } else {
                    arena.insert_before(at, node).unwrap();
                }
                handles.push(node);
            }
            assert_symmetric(&arena, &handles);

            let head = arena.head(handles[0]).unwrap().unwrap();
            prop_assert_eq!(arena.walk_forward(head).unwrap().count(), handles.len());
            prop_assert!(!arena.is_circular(head).unwrap());
        }

        #[test]
        fn circle_visits_each_node_once(len in 1usize..40, start in any::<prop::sample::Index>()) {
            let values: Vec<u8> = (0..len as u8).collect();
            let (mut arena, handles) = build(&values);
            arena.join(handles[len - 1], handles[0]).unwrap();
            let start = handles[start.index(len)];

            prop_assert!(arena.is_circular(start).unwrap());
            prop_assert_eq!(arena.head(start).unwrap(), None);
            prop_assert_eq!(arena.tail(start).unwrap(), None);

            let mut seen: Vec<_> = arena.walk_forward(start).unwrap().map(|(h, _)| h).collect();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), len);
            prop_assert_eq!(arena.walk_backward(start).unwrap().count(), len);
        }
    }
}

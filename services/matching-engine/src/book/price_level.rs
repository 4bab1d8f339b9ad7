//! Per-price FIFO queues
//!
//! Orders live in a shared slab arena; each price level is a doubly-linked
//! list threaded through the arena nodes. Appending and unlinking are O(1),
//! and the slab key doubles as the stable position handle held by the
//! by-id index.

use slab::Slab;
use types::order::Order;

/// Arena node: one resting order plus its FIFO links.
#[derive(Debug, Clone)]
pub(crate) struct OrderNode {
    pub(crate) order: Order,
    prev: Option<usize>,
    next: Option<usize>,
}

impl OrderNode {
    pub(crate) fn new(order: Order) -> Self {
        Self {
            order,
            prev: None,
            next: None,
        }
    }
}

/// FIFO of resting orders at a single price on a single side.
///
/// Holds only the list endpoints; the links live in the arena nodes, so
/// time priority is preserved without any per-level allocation.
#[derive(Debug, Clone, Default)]
pub(crate) struct PriceLevel {
    head: Option<usize>,
    tail: Option<usize>,
}

impl PriceLevel {
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Slab key of the order at the front of the queue.
    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    /// Append a freshly inserted node at the back of the queue.
    pub(crate) fn push_back(&mut self, arena: &mut Slab<OrderNode>, key: usize) {
        match self.tail {
            Some(tail) => {
                arena[tail].next = Some(key);
                arena[key].prev = Some(tail);
            }
            None => {
                self.head = Some(key);
            }
        }
        arena[key].next = None;
        self.tail = Some(key);
    }

    /// Unlink a node from anywhere in the queue in O(1).
    pub(crate) fn unlink(&mut self, arena: &mut Slab<OrderNode>, key: usize) {
        let prev = arena[key].prev;
        let next = arena[key].next;

        match prev {
            Some(p) => arena[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena[n].prev = prev,
            None => self.tail = prev,
        }

        arena[key].prev = None;
        arena[key].next = None;
    }

    /// Walk the queue front to back, yielding slab keys.
    pub(crate) fn iter<'a>(&self, arena: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            arena,
            cursor: self.head,
        }
    }
}

pub(crate) struct LevelIter<'a> {
    arena: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl Iterator for LevelIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.arena[key].next;
        Some(key)
    }
}

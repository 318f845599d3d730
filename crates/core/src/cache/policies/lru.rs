//! Least Recently Used (LRU) eviction policy.
//!
//! Maintains a recency-ordered doubly-linked list of way indices with the
//! most recently used way at the head. The list nodes live in an arena of
//! fixed-capacity slots indexed by way, with `prev`/`next` stored as slot
//! indices rather than owned references, giving O(1) `touch` and O(1)
//! `victim` without reference cycles.

use super::ReplacementPolicy;

/// Sentinel slot index meaning "no slot".
const NIL: usize = usize::MAX;

/// One arena slot; `linked` marks ways that have been touched at least once.
#[derive(Clone, Copy)]
struct Slot {
    prev: usize,
    next: usize,
    linked: bool,
}

/// LRU policy state for one cache set.
pub struct LruPolicy {
    slots: Vec<Slot>,
    head: usize,
    tail: usize,
}

impl LruPolicy {
    /// Creates an empty policy over `ways` way indices; nothing is touched
    /// yet, so the default victim is way 0.
    pub fn new(ways: usize) -> Self {
        Self {
            slots: vec![
                Slot {
                    prev: NIL,
                    next: NIL,
                    linked: false,
                };
                ways
            ],
            head: NIL,
            tail: NIL,
        }
    }

    /// Detaches `way` from the recency list.
    fn unlink(&mut self, way: usize) {
        let Slot { prev, next, .. } = self.slots[way];

        match prev {
            NIL => self.head = next,
            p => self.slots[p].next = next,
        }
        match next {
            NIL => self.tail = prev,
            n => self.slots[n].prev = prev,
        }

        self.slots[way].prev = NIL;
        self.slots[way].next = NIL;
    }

    /// Attaches `way` at the most-recently-used end.
    fn push_front(&mut self, way: usize) {
        self.slots[way].prev = NIL;
        self.slots[way].next = self.head;

        match self.head {
            NIL => self.tail = way,
            h => self.slots[h].prev = way,
        }
        self.head = way;
    }
}

impl ReplacementPolicy for LruPolicy {
    fn touch(&mut self, way: usize) {
        if self.slots[way].linked {
            self.unlink(way);
        } else {
            self.slots[way].linked = true;
        }
        self.push_front(way);
    }

    fn victim(&self) -> usize {
        // Before any touch the list is empty; way 0 is the default victim.
        if self.tail == NIL { 0 } else { self.tail }
    }
}

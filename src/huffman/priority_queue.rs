//! A bounded priority queue backed by a sorted circular buffer.
//!
//! Inserting binary searches the sorted contents and shifts the tail by one slot, extracting
//! always pops the head. While building a tree the queue holds at most 256 entries.
use super::node::Node;

/// Anything that can be ordered in a [PriorityQueue]. Lower values are extracted first.
pub trait Prioritized {
    fn priority(&self) -> u64;
}

impl Prioritized for Box<Node> {
    fn priority(&self) -> u64 {
        self.frequency
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PriorityQueueError {
    #[error("Priority queue is at its capacity of {capacity} entries")]
    Full { capacity: usize },
    #[error("Priority queue is empty")]
    Empty,
}

pub struct PriorityQueue<T> {
    /// Slots of the ring buffer, `len` occupied slots starting at `head`
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T: Prioritized> PriorityQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        PriorityQueue {
            slots,
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Maps a position in sorted order to a slot in the ring
    fn slot(&self, position: usize) -> usize {
        (self.head + position) % self.capacity()
    }

    fn priority_at(&self, position: usize) -> u64 {
        match &self.slots[self.slot(position)] {
            Some(item) => item.priority(),
            None => unreachable!("occupied slot {} is empty", position),
        }
    }

    /// Finds the first position holding a strictly greater priority, so equal priorities
    /// leave the queue in the order they were inserted.
    fn insertion_point(&self, priority: u64) -> usize {
        let mut low = 0;
        let mut high = self.len;
        while low < high {
            let mid = low + (high - low) / 2;
            if self.priority_at(mid) <= priority {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    pub fn insert(&mut self, item: T) -> Result<(), PriorityQueueError> {
        if self.is_full() {
            return Err(PriorityQueueError::Full {
                capacity: self.capacity(),
            });
        }

        let position = self.insertion_point(item.priority());

        // shift everything behind the insertion point one slot towards the tail
        for idx in (position..self.len).rev() {
            let from = self.slot(idx);
            let to = self.slot(idx + 1);
            self.slots[to] = self.slots[from].take();
        }

        let target = self.slot(position);
        self.slots[target] = Some(item);
        self.len += 1;
        Ok(())
    }

    pub fn extract_min(&mut self) -> Result<T, PriorityQueueError> {
        if self.is_empty() {
            return Err(PriorityQueueError::Empty);
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        match item {
            Some(item) => Ok(item),
            None => unreachable!("head of a non empty queue is empty"),
        }
    }

    pub fn peek_min(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }
}

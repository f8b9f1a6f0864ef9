// SPDX-License-Identifier: MPL-2.0
//! Circular buffer for diagnostic event storage.
//!
//! Memory-bounded: once full, each push evicts the oldest entry.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::BufferCapacity;

/// A generic circular buffer with fixed capacity.
///
/// Elements are stored in chronological order (oldest first).
///
/// # Example
///
/// ```
/// use iced_toasts::diagnostics::CircularBuffer;
///
/// let mut buffer: CircularBuffer<u32> = CircularBuffer::with_raw_capacity(2);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
///
/// let items: Vec<_> = buffer.iter().copied().collect();
/// assert_eq!(items, vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
    /// Entries dropped to make room since creation.
    evicted: u64,
}

impl<T> CircularBuffer<T> {
    /// Creates a new circular buffer with the specified capacity.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Creates a new circular buffer with a raw capacity value.
    ///
    /// For production use, prefer [`CircularBuffer::new`] with [`BufferCapacity`].
    #[must_use]
    pub fn with_raw_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Pushes an element, evicting the oldest if at capacity.
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
            self.evicted += 1;
        }
        self.data.push_back(item);
    }

    /// Returns an iterator over the elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the maximum capacity of the buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many elements were evicted to make room.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Clears all elements. Capacity and eviction count are kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

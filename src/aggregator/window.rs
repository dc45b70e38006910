use std::collections::VecDeque;
use crate::types::TradeEvent;

/// Newest-first list of retained trades, capped at `capacity`.
#[derive(Clone, Debug)]
pub struct TransactionWindow {
    capacity: usize,
    events: VecDeque<TradeEvent>,
}

impl TransactionWindow {
    pub fn new(capacity: usize) -> Self {
        TransactionWindow {
            capacity,
            events: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Prepends `batch` in reverse arrival order and drops the oldest
    /// entries beyond capacity. Returns the number of evicted events.
    pub fn ingest(&mut self, batch: Vec<TradeEvent>) -> usize {
        // Only the newest `capacity` events of an oversized batch can survive.
        let skip = batch.len().saturating_sub(self.capacity);
        let mut evicted = skip;

        for event in batch.into_iter().skip(skip) {
            self.events.push_front(event);
        }

        if self.events.len() > self.capacity {
            evicted += self.events.len() - self.capacity;
            self.events.truncate(self.capacity);
        }

        evicted
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeEvent> {
        self.events.iter()
    }

    pub fn newest(&self) -> Option<&TradeEvent> {
        self.events.front()
    }

    pub fn to_vec(&self) -> Vec<TradeEvent> {
        self.events.iter().cloned().collect()
    }
}

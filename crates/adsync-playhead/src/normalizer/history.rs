//! Bounded record of detected jumps.
//!
//! Collaborators that computed a value against an older baseline use the
//! history to learn how much correction happened since.

use circular_buffer::CircularBuffer;

/// Number of jumps retained.
pub const JUMP_HISTORY_CAPACITY: usize = 20;

/// A detected jump: the raw sample and its delta from the previous raw sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpEntry {
    pub raw_time: f64,
    pub delta: f64,
}

/// Fixed-capacity FIFO of jumps; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct JumpHistory {
    entries: CircularBuffer<JUMP_HISTORY_CAPACITY, JumpEntry>,
}

impl Default for JumpHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: CircularBuffer::new(),
        }
    }

    /// Record a jump, evicting the oldest entry at capacity.
    pub fn record(&mut self, raw_time: f64, delta: f64) {
        self.entries.push_back(JumpEntry { raw_time, delta });
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &JumpEntry> {
        self.entries.iter()
    }

    /// Sum of the deltas of every entry recorded at a raw time after `raw_time`.
    pub fn delta_since(&self, raw_time: f64) -> f64 {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.raw_time > raw_time)
            .map(|entry| entry.delta)
            .sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_has_no_delta() {
        let history = JumpHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.delta_since(0.0), 0.0);
    }

    #[test]
    fn test_delta_since_sums_later_entries() {
        let mut history = JumpHistory::new();
        history.record(10.0, 3.0);
        history.record(20.0, -2.5);
        history.record(30.0, 4.0);

        assert_eq!(history.delta_since(5.0), 4.5);
        assert_eq!(history.delta_since(10.0), 1.5);
        assert_eq!(history.delta_since(25.0), 4.0);
        assert_eq!(history.delta_since(30.0), 0.0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = JumpHistory::new();
        for i in 0..(JUMP_HISTORY_CAPACITY + 5) {
            history.record(i as f64, 1.0);
        }
        assert_eq!(history.len(), JUMP_HISTORY_CAPACITY);
        let oldest = history.iter().next().unwrap();
        assert_eq!(oldest.raw_time, 5.0);
        let newest = history.iter().next_back().unwrap();
        assert_eq!(newest.raw_time, (JUMP_HISTORY_CAPACITY + 4) as f64);
    }

    #[test]
    fn test_clear() {
        let mut history = JumpHistory::new();
        history.record(1.0, 2.0);
        history.clear();
        assert!(history.is_empty());
    }
}

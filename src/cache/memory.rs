//! In-process cache backend

use std::collections::HashMap;

use super::ttl::{CacheBackend, CacheEntry, IndexEntry};
use crate::error::CacheError;

struct Slot<T> {
    seq: u64,
    entry: CacheEntry<T>,
}

/// Insertion-ordered in-memory map. Lives as long as the process.
pub struct MemoryBackend<T> {
    slots: HashMap<String, Slot<T>>,
    next_seq: u64,
}

impl<T> MemoryBackend<T> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Default for MemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> CacheBackend<T> for MemoryBackend<T> {
    fn read(&self, key: &str) -> Result<Option<CacheEntry<T>>, CacheError> {
        Ok(self.slots.get(key).map(|slot| slot.entry.clone()))
    }

    fn write(&mut self, key: &str, entry: CacheEntry<T>) -> Result<(), CacheError> {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.entry = entry;
        } else {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.slots.insert(key.to_string(), Slot { seq, entry });
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        self.slots.remove(key);
        Ok(())
    }

    fn index(&self) -> Result<Vec<IndexEntry>, CacheError> {
        let mut slots: Vec<_> = self.slots.iter().collect();
        slots.sort_by_key(|(_, slot)| slot.seq);
        Ok(slots
            .into_iter()
            .map(|(key, slot)| IndexEntry {
                key: key.clone(),
                stored_at: Some(slot.entry.timestamp),
            })
            .collect())
    }

    fn clear(&mut self) -> Result<usize, CacheError> {
        let removed = self.slots.len();
        self.slots.clear();
        Ok(removed)
    }
}

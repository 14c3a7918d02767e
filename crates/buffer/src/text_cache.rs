// Chunk: docs/chunks/text_cache - Materialized text cache with generation invalidation

//! Cache of materialized substrings, keyed by the exact requested span.
//!
//! Rebuilding a substring walks the covering pieces and copies out of both
//! backing buffers; repeated reads of the same span (a visible region being
//! redrawn, a line being re-measured) would pay that cost every time. The
//! cache stores previously built strings keyed by the exact document span
//! requested.
//!
//! # Invalidation
//!
//! A single generation counter stands in for clearing the map. Every entry
//! is stamped with the generation it was built in; a mutation that could
//! change the meaning of any cached span bumps the counter, turning every
//! older entry into a miss. Stale entries are evicted lazily: a stale hit is
//! dropped on lookup, and inserts sweep the map once it grows past a bound.
//!
//! Insertions exactly at the document end do not bump the counter: appending
//! never changes the content of any span that was previously readable.
//!
//! Cache state never affects a returned value, only its cost.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::span::Span;

/// Entry count that triggers a sweep of stale entries on insert.
const STALE_SWEEP_THRESHOLD: usize = 64;

#[derive(Debug)]
struct CacheEntry {
    generation: u64,
    text: String,
}

/// Maps a requested document span to a previously built string.
#[derive(Debug)]
pub struct TextCache {
    entries: HashMap<Span, CacheEntry>,
    generation: u64,
}

impl TextCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            generation: 0,
        }
    }

    /// Returns the cached string for `span` if it was built in the current
    /// generation. A stale entry is evicted and reported as a miss.
    pub fn get(&mut self, span: Span) -> Option<&str> {
        match self.entries.entry(span) {
            Entry::Occupied(entry) => {
                if entry.get().generation == self.generation {
                    Some(entry.into_mut().text.as_str())
                } else {
                    entry.remove();
                    None
                }
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Stores `text` for `span` in the current generation.
    pub fn insert(&mut self, span: Span, text: String) {
        if self.entries.len() >= STALE_SWEEP_THRESHOLD {
            let current = self.generation;
            self.entries.retain(|_, entry| entry.generation == current);
        }
        self.entries.insert(
            span,
            CacheEntry {
                generation: self.generation,
                text,
            },
        );
    }

    /// Turns every existing entry into a miss.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TextCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_on_empty() {
        let mut cache = TextCache::new();
        assert_eq!(cache.get(Span::new(0, 5)), None);
    }

    #[test]
    fn test_hit_returns_stored_text() {
        let mut cache = TextCache::new();
        cache.insert(Span::new(0, 5), "hello".to_string());
        assert_eq!(cache.get(Span::new(0, 5)), Some("hello"));
        // An exact-span key: a different span over the same text is a miss.
        assert_eq!(cache.get(Span::new(0, 4)), None);
    }

    #[test]
    fn test_invalidate_turns_entries_stale() {
        let mut cache = TextCache::new();
        cache.insert(Span::new(0, 5), "hello".to_string());
        cache.invalidate();
        assert_eq!(cache.get(Span::new(0, 5)), None);
        // The stale entry was evicted by the lookup.
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_reinsert_after_invalidate() {
        let mut cache = TextCache::new();
        cache.insert(Span::new(0, 5), "hello".to_string());
        cache.invalidate();
        cache.insert(Span::new(0, 5), "world".to_string());
        assert_eq!(cache.get(Span::new(0, 5)), Some("world"));
    }

    #[test]
    fn test_insert_sweeps_stale_entries() {
        let mut cache = TextCache::new();
        for i in 0..STALE_SWEEP_THRESHOLD {
            cache.insert(Span::new(i, 1), "x".to_string());
        }
        cache.invalidate();
        cache.insert(Span::new(0, 2), "xy".to_string());
        // The sweep dropped every stale entry; only the fresh one remains.
        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get(Span::new(0, 2)), Some("xy"));
    }

    #[test]
    fn test_current_entries_survive_sweep() {
        let mut cache = TextCache::new();
        for i in 0..STALE_SWEEP_THRESHOLD {
            cache.insert(Span::new(i, 1), "x".to_string());
        }
        // Same generation: the sweep keeps them all.
        cache.insert(Span::new(100, 2), "xy".to_string());
        assert_eq!(cache.entry_count(), STALE_SWEEP_THRESHOLD + 1);
    }
}

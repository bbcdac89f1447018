use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::scene::slide::Slide;

/// One committed state of the slide list.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Deep copy of the slide list.
    pub slides: Vec<Slide>,
    /// When the entry was committed.
    pub at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            at: Utc::now(),
        }
    }
}

/// Linear, bounded snapshot history.
///
/// `entries[index]` is always the last committed state. Committing drops the redo tail,
/// appends, and evicts from the front once more than `cap` entries are held.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    cap: usize,
}

impl History {
    /// History holding `initial` as its only entry.
    pub fn new(initial: Vec<Slide>, cap: usize) -> Self {
        let mut entries = VecDeque::with_capacity(cap.clamp(1, 64));
        entries.push_back(HistoryEntry::new(initial));
        Self {
            entries,
            index: 0,
            cap: cap.max(1),
        }
    }

    /// Record `slides` as the new current state.
    pub fn commit(&mut self, slides: Vec<Slide>) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(HistoryEntry::new(slides));
        while self.entries.len() > self.cap {
            self.entries.pop_front();
            tracing::debug!(cap = self.cap, "history full; oldest entry evicted");
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back; returns the state to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&[Slide]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).map(|e| e.slides.as_slice())
    }

    /// Step forward; returns the state to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&[Slide]> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index).map(|e| e.slides.as_slice())
    }

    /// Whether [`History::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether [`History::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The committed state.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    /// Position of the committed state.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least its initial entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry capacity.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Vec<Slide>) {
        self.entries.clear();
        self.entries.push_back(HistoryEntry::new(initial));
        self.index = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/history.rs"]
mod tests;

//! Indexed max-heap over free segments
use alloc::vec::Vec;

use crate::partition::SegmentId;

/// Decides which of two segments belongs closer to the heap root.
///
/// The heap stores handles only; the key data lives with whoever implements
/// this trait.
pub(crate) trait Ranking {
    /// Returns `true` if `a` must be popped before `b`.
    fn outranks(&self, a: SegmentId, b: SegmentId) -> bool;
}

/// A binary max-heap of segment handles with a handle→position table, so
/// that any entry can be removed or re-sifted in `O(log n)` without a search.
#[derive(Debug, Clone, Default)]
pub(crate) struct FreeHeap {
    entries: Vec<SegmentId>,
    /// Indexed by [`SegmentId::index`]. `Some(i)` iff `entries[i]` is the
    /// handle.
    positions: Vec<Option<usize>>,
}

impl FreeHeap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top-ranked handle.
    #[inline]
    pub fn peek(&self) -> Option<SegmentId> {
        self.entries.first().copied()
    }

    #[inline]
    pub fn position_of(&self, id: SegmentId) -> Option<usize> {
        self.positions.get(id.index()).copied().flatten()
    }

    /// Iterate over the handles in heap-array order.
    pub fn iter(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.entries.iter().copied()
    }

    pub fn insert(&mut self, id: SegmentId, ranking: &impl Ranking) {
        debug_assert_eq!(self.position_of(id), None, "{:?} is already queued", id);
        if self.positions.len() <= id.index() {
            self.positions.resize(id.index() + 1, None);
        }

        let pos = self.entries.len();
        self.entries.push(id);
        self.positions[id.index()] = Some(pos);
        self.sift_up(pos, ranking);
    }

    /// Remove the entry at `pos` and return its handle. Does nothing if the
    /// heap is empty.
    pub fn remove_at(&mut self, pos: usize, ranking: &impl Ranking) -> Option<SegmentId> {
        let last = self.entries.len().checked_sub(1)?;
        debug_assert!(pos < self.len());

        self.swap(pos, last);
        let removed = self.entries.pop()?;
        self.positions[removed.index()] = None;

        // The entry moved into `pos` may belong either higher or lower
        if pos < self.entries.len() {
            self.sift_down(pos, ranking);
            self.sift_up(pos, ranking);
        }

        Some(removed)
    }

    /// Restore the heap order after the rank of the entry at `pos` dropped.
    #[inline]
    pub fn restore_after_decrease(&mut self, pos: usize, ranking: &impl Ranking) {
        self.sift_down(pos, ranking);
    }

    /// Restore the heap order after the rank of the entry at `pos` rose.
    #[inline]
    pub fn restore_after_increase(&mut self, pos: usize, ranking: &impl Ranking) {
        self.sift_up(pos, ranking);
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions[self.entries[a].index()] = Some(a);
        self.positions[self.entries[b].index()] = Some(b);
    }

    fn sift_up(&mut self, mut pos: usize, ranking: &impl Ranking) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !ranking.outranks(self.entries[pos], self.entries[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize, ranking: &impl Ranking) {
        let len = self.entries.len();
        loop {
            let mut top = pos;
            for child in [pos * 2 + 1, pos * 2 + 2] {
                if child < len && ranking.outranks(self.entries[child], self.entries[top]) {
                    top = child;
                }
            }
            if top == pos {
                return;
            }
            self.swap(pos, top);
            pos = top;
        }
    }
}

#[cfg(test)]
mod tests;

//! A slow but obviously correct reference allocator
use alloc::{vec, vec::Vec};
use core::ops::Range;

use crate::request::{self, RequestSink};

/// A largest-fit allocator that keeps one flag per arena unit and finds the
/// longest free run by scanning the whole arena.
///
/// It honors the same request contract as [`LargestFit`](crate::LargestFit)
/// and is meant for cross-checking it. Allocation takes `O(arena_size)` time.
#[derive(Debug, Clone)]
pub struct LinearScan {
    used: Vec<bool>,
    /// The region granted by each request, if it's still allocated
    records: Vec<Option<Range<usize>>>,
}

impl LinearScan {
    pub fn new(arena_size: usize) -> Self {
        Self {
            used: vec![false; arena_size],
            records: Vec::new(),
        }
    }

    /// Find the leftmost of the longest free runs.
    pub fn longest_free_run(&self) -> Option<Range<usize>> {
        let mut best: Option<Range<usize>> = None;
        let mut run_start = None;
        for (i, &used) in self.used.iter().enumerate() {
            if used {
                run_start = None;
                continue;
            }
            let start = *run_start.get_or_insert(i);
            if best.as_ref().map_or(true, |best| i + 1 - start > best.len()) {
                best = Some(start..i + 1);
            }
        }
        best
    }

    /// The total number of free units.
    pub fn free_len(&self) -> usize {
        self.used.iter().filter(|&&used| !used).count()
    }

    fn fill(&mut self, range: Range<usize>, used: bool) {
        for cell in &mut self.used[range] {
            debug_assert_ne!(*cell, used);
            *cell = used;
        }
    }
}

impl RequestSink for LinearScan {
    fn allocate(&mut self, size: usize) -> Option<usize> {
        let region = match self.longest_free_run() {
            Some(run) if size > 0 && run.len() >= size => run.start..run.start + size,
            _ => {
                self.records.push(None);
                return None;
            }
        };

        let start = region.start;
        self.fill(region.clone(), true);
        self.records.push(Some(region));
        Some(start)
    }

    fn free(&mut self, request: usize) -> bool {
        self.records.push(None);
        match self.records.get_mut(request).and_then(Option::take) {
            Some(region) => {
                self.fill(region, false);
                true
            }
            None => false,
        }
    }
}

/// [`crate::solve`], but computed by [`LinearScan`].
pub fn solve(arena_size: usize, requests: &[i64]) -> Vec<i64> {
    request::run(&mut LinearScan::new(arena_size), requests.iter().copied())
}

//! The largest-fit allocation manager
use alloc::vec::Vec;
use core::{fmt, ops::Range};

use crate::{
    heap::{FreeHeap, Ranking},
    partition::{PartitionList, SegmentId, Side},
};

#[doc = svgbobdoc::transform!(
/// A largest-fit allocator over a linear arena of `arena_size` units.
///
/// # Data Structure Overview
///
/// <center>
/// ```svgbob
///   Partition list (address order)
///
///        ,--------,    ,--------,    ,------------,    ,--------,
///   ---->|  used  |<-->|  free  |<-->|    used    |<-->|  free  |
///        | 0..3   |    | 3..9   |    |   9..14    |    | 14..16 |
///        '--------'    '---+----'    '------------'    '---+----'
///             ^            ^                               ^
/// ╶╶╶╶╶╶╶╶╶╶╶╶|╶╶╶╶╶╶╶╶╶╶╶╶|╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶╶|╶╶╶╶╶╶
///   History   |            |  Free-segment heap            |
///             |            |                               |
///   ,---+---+-+-+---,      |   ,-----+-----,               |
///   | ∅ | ∅ | O | ∅ |      '---+--O  |  O--+---------------'
///   '---+---+---+---'          '-----+-----'
///     1   2   3   4              root
/// ```
/// </center>
///
/// Every issued request, allocation or free, takes one slot in the history.
/// A slot refers to the segment granted by that request until the segment is
/// freed; failed allocations and free requests leave their slot empty.
///
/// # Properties
///
///  - Allocation always carves from the largest free segment; among equally
///    large ones the lowest address wins.
///
///  - Both [`Self::allocate`] and [`Self::free`] complete in `O(log n)` time,
///    `n` being the number of free segments.
///
///  - Neither operation can fail in a way that leaves the allocator
///    inconsistent. Allocation failure is reported by `None`; freeing
///    something that isn't allocated is ignored.
///
/// # Examples
///
/// ```rust
/// use lfalloc::LargestFit;
///
/// // Scenario: [2, 2, -1, -2, 4] over four units
/// let mut alloc = LargestFit::new(4);
/// assert_eq!(alloc.allocate(2), Some(0));
/// assert_eq!(alloc.allocate(2), Some(2));
/// assert!(alloc.free(0));
/// assert!(alloc.free(1));
/// assert_eq!(alloc.largest_free(), Some(0..4));
/// assert_eq!(alloc.allocate(4), Some(0));
/// ```
///
)]
#[derive(Clone)]
pub struct LargestFit {
    arena_size: usize,
    list: PartitionList,
    heap: FreeHeap,
    history: Vec<Option<SegmentId>>,
}

/// An address-ordered view of one segment. Returned by
/// [`LargestFit::segments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    pub range: Range<usize>,
    pub free: bool,
}

/// Ranks by size (descending), then by address (ascending).
impl Ranking for PartitionList {
    #[inline]
    fn outranks(&self, a: SegmentId, b: SegmentId) -> bool {
        let (a, b) = (self.get(a), self.get(b));
        a.len > b.len || (a.len == b.len && a.start < b.start)
    }
}

impl fmt::Debug for LargestFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LargestFit")
            .field("arena_size", &self.arena_size)
            .field("segments", &SegmentsDebug(self))
            .field("history_len", &self.history.len())
            .finish()
    }
}

struct SegmentsDebug<'a>(&'a LargestFit);

impl fmt::Debug for SegmentsDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.segments().map(|segment| {
                let tag = if segment.free { "free" } else { "used" };
                (tag, segment.range)
            }))
            .finish()
    }
}

impl LargestFit {
    /// Construct an allocator whose arena is entirely free.
    pub fn new(arena_size: usize) -> Self {
        log::debug!("LargestFit::new({})", arena_size);

        let list = PartitionList::new(arena_size);
        let mut heap = FreeHeap::new();
        if let Some(head) = list.head() {
            heap.insert(head, &list);
        }

        Self {
            arena_size,
            list,
            heap,
            history: Vec::new(),
        }
    }

    /// Attempt to allocate `size` contiguous units.
    ///
    /// Returns the zero-based starting offset of the allocated region on
    /// success; `None` if no free segment is at least `size` units long.
    /// A zero `size` always fails. Either way the request takes one history
    /// slot.
    ///
    /// # Time Complexity
    ///
    /// `O(log n)` where `n` is the number of free segments.
    pub fn allocate(&mut self, size: usize) -> Option<usize> {
        let target = match self.heap.peek() {
            Some(target) if size > 0 && self.list.get(target).len >= size => target,
            _ => {
                log::trace!("allocate({}) → fail", size);
                self.history.push(None);
                return None;
            }
        };

        let start = self.list.get(target).start;
        let carved = self.list.insert_before(target, start, size, false);
        self.history.push(Some(carved));

        let rest = self.list.get_mut(target);
        rest.start += size;
        rest.len -= size;

        // `target` is the root, so shrinking it and moving its start to the
        // right can only lower its rank
        if rest.len == 0 {
            log::trace!("allocate({}) → {} (exact fit)", size, start);
            self.heap.remove_at(0, &self.list);
            self.list.unlink(target);
        } else {
            log::trace!("allocate({}) → {}", size, start);
            self.heap.restore_after_decrease(0, &self.list);
        }

        Some(start)
    }

    /// Release the region granted by the `request`-th issued request
    /// (zero-based, counting both allocation and free requests).
    ///
    /// This call takes one history slot itself. Returns `false` and does
    /// nothing else if the slot is empty: it was never granted, its
    /// allocation failed, it was already freed, or `request` is out of range.
    ///
    /// # Time Complexity
    ///
    /// `O(log n)` where `n` is the number of free segments.
    pub fn free(&mut self, request: usize) -> bool {
        self.history.push(None);

        let seg = match self.history.get_mut(request).and_then(Option::take) {
            Some(seg) => seg,
            None => {
                log::trace!("free({}) → no-op", request);
                return false;
            }
        };

        let prev = self
            .list
            .neighbor(seg, Side::Prev)
            .filter(|&prev| self.list.get(prev).free);
        let next = self
            .list
            .neighbor(seg, Side::Next)
            .filter(|&next| self.list.get(next).free);
        let (seg_start, seg_len) = {
            let seg = self.list.get(seg);
            (seg.start, seg.len)
        };

        let merged = match (prev, next) {
            (None, None) => {
                log::trace!(
                    "free({}): {:?} stands alone",
                    request,
                    seg_start..seg_start + seg_len
                );
                self.list.get_mut(seg).free = true;
                self.heap.insert(seg, &self.list);
                seg
            }
            (Some(prev), Some(next)) => {
                log::trace!("free({}): merging into both neighbors", request);
                let pos = self.heap.position_of(next);
                debug_assert!(pos.is_some(), "free segment {:?} is not queued", next);
                if let Some(pos) = pos {
                    self.heap.remove_at(pos, &self.list);
                }
                let next_len = self.list.get(next).len;
                self.list.get_mut(prev).len += seg_len + next_len;
                self.list.unlink(seg);
                self.list.unlink(next);
                self.restore_after_growth(prev);
                prev
            }
            (None, Some(next)) => {
                log::trace!("free({}): merging into the next segment", request);
                let next_seg = self.list.get_mut(next);
                next_seg.start = seg_start;
                next_seg.len += seg_len;
                self.list.unlink(seg);
                self.restore_after_growth(next);
                next
            }
            (Some(prev), None) => {
                log::trace!("free({}): merging into the previous segment", request);
                self.list.get_mut(prev).len += seg_len;
                self.list.unlink(seg);
                self.restore_after_growth(prev);
                prev
            }
        };

        debug_assert!(
            !self.list.neighbor_is_free(merged, Side::Prev)
                && !self.list.neighbor_is_free(merged, Side::Next),
            "{:?} was left next to a free segment",
            merged
        );

        true
    }

    fn restore_after_growth(&mut self, id: SegmentId) {
        let pos = self.heap.position_of(id);
        debug_assert!(pos.is_some(), "free segment {:?} is not queued", id);
        if let Some(pos) = pos {
            self.heap.restore_after_increase(pos, &self.list);
        }
    }

    #[inline]
    pub fn arena_size(&self) -> usize {
        self.arena_size
    }

    /// The number of requests issued so far.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The total number of free units.
    pub fn free_len(&self) -> usize {
        self.heap.iter().map(|id| self.list.get(id).len).sum()
    }

    /// The segment the next allocation would carve from.
    pub fn largest_free(&self) -> Option<Range<usize>> {
        let segment = self.list.get(self.heap.peek()?);
        Some(segment.start..segment.end())
    }

    /// Iterate over the segments in address order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentInfo> + '_ {
        self.list.iter().map(|(_, segment)| SegmentInfo {
            range: segment.start..segment.end(),
            free: segment.free,
        })
    }
}

#[cfg(test)]
impl LargestFit {
    /// Panic if any structural invariant is broken.
    pub(crate) fn assert_consistent(&self) {
        let mut expected_start = 0;
        let mut prev_free = false;
        let mut free_count = 0;
        for (id, segment) in self.list.iter() {
            assert!(segment.is_linked(), "{:?} is reachable but unlinked", id);
            assert!(segment.len > 0, "{:?} is empty", id);
            assert_eq!(
                segment.start, expected_start,
                "{:?} doesn't start where its predecessor ends",
                id
            );
            assert!(
                !(prev_free && segment.free),
                "{:?} and its predecessor are both free",
                id
            );
            if segment.free {
                free_count += 1;
                assert!(
                    self.heap.position_of(id).is_some(),
                    "free segment {:?} is not queued",
                    id
                );
            } else {
                assert_eq!(self.heap.position_of(id), None, "{:?} is used but queued", id);
            }
            expected_start = segment.end();
            prev_free = segment.free;
        }
        assert_eq!(expected_start, self.arena_size, "segments don't cover the arena");

        assert_eq!(self.heap.len(), free_count, "the heap holds stale entries");
        for (pos, id) in self.heap.iter().enumerate() {
            assert_eq!(self.heap.position_of(id), Some(pos));
            assert!(self.list.get(id).free, "{:?} is queued but used", id);
            if pos > 0 {
                let parent = self.heap.iter().nth((pos - 1) / 2).unwrap();
                assert!(!self.list.outranks(id, parent), "heap order is broken at {}", pos);
            }
        }

        for (request, entry) in self.history.iter().enumerate() {
            if let Some(id) = *entry {
                let segment = self.list.get(id);
                assert!(
                    segment.is_linked() && !segment.free,
                    "request {} refers to a dead or free segment",
                    request
                );
            }
        }
    }
}

//! The segment chain partitioning the arena
use alloc::vec::Vec;

/// A stable handle to a segment slot owned by a [`PartitionList`].
///
/// Slots are never reused while the list is alive, so a handle that once
/// referred to a segment keeps referring to that (possibly unlinked) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Selects a neighbor in address order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Prev,
    Next,
}

/// One maximal run of uniform occupancy.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub start: usize,
    pub len: usize,
    pub free: bool,
    prev: Option<SegmentId>,
    next: Option<SegmentId>,
    /// `false` once the segment has been removed from the chain.
    linked: bool,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

/// A doubly-linked chain of segments stored in a slot arena.
///
/// The list only keeps the links consistent. Keeping the chain gapless and
/// free of adjacent free segments is the caller's job.
#[derive(Debug, Clone)]
pub(crate) struct PartitionList {
    segments: Vec<Segment>,
    head: Option<SegmentId>,
}

impl PartitionList {
    /// Construct a list holding one free segment covering `arena_size` units.
    /// A zero-sized arena produces an empty list.
    pub fn new(arena_size: usize) -> Self {
        let mut list = Self {
            segments: Vec::new(),
            head: None,
        };
        if arena_size > 0 {
            list.head = Some(list.push_slot(Segment {
                start: 0,
                len: arena_size,
                free: true,
                prev: None,
                next: None,
                linked: true,
            }));
        }
        list
    }

    fn push_slot(&mut self, segment: Segment) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(segment);
        id
    }

    #[inline]
    pub fn head(&self) -> Option<SegmentId> {
        self.head
    }

    #[inline]
    pub fn get(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.0]
    }

    #[inline]
    pub fn neighbor(&self, id: SegmentId, side: Side) -> Option<SegmentId> {
        let segment = self.get(id);
        match side {
            Side::Prev => segment.prev,
            Side::Next => segment.next,
        }
    }

    #[inline]
    pub fn neighbor_is_free(&self, id: SegmentId, side: Side) -> bool {
        self.neighbor(id, side)
            .map_or(false, |neighbor| self.get(neighbor).free)
    }

    /// Splice a new segment immediately before `next` and return its handle.
    pub fn insert_before(
        &mut self,
        next: SegmentId,
        start: usize,
        len: usize,
        free: bool,
    ) -> SegmentId {
        debug_assert!(self.get(next).is_linked());
        let prev = self.get(next).prev;
        let id = self.push_slot(Segment {
            start,
            len,
            free,
            prev,
            next: Some(next),
            linked: true,
        });

        self.get_mut(next).prev = Some(id);
        match prev {
            Some(prev) => self.get_mut(prev).next = Some(id),
            None => self.head = Some(id),
        }

        id
    }

    /// Remove a segment from the chain. The slot stays allocated.
    pub fn unlink(&mut self, id: SegmentId) {
        debug_assert!(self.get(id).is_linked(), "{:?} is already unlinked", id);
        let Segment { prev, next, .. } = *self.get(id);

        match prev {
            Some(prev) => self.get_mut(prev).next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            self.get_mut(next).prev = prev;
        }

        let segment = self.get_mut(id);
        segment.prev = None;
        segment.next = None;
        segment.linked = false;
    }

    /// Iterate over the linked segments in address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

pub(crate) struct Iter<'a> {
    list: &'a PartitionList,
    cursor: Option<SegmentId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SegmentId, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let segment = self.list.get(id);
        self.cursor = segment.next;
        Some((id, segment))
    }
}

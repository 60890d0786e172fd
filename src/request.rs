//! Signed-integer request streams
use alloc::vec::Vec;

use crate::LargestFit;

/// Returned in place of a starting address when an allocation fails.
pub const FAILURE: i64 = -1;

/// A single allocator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// Allocate this many units.
    Allocate(usize),
    /// Free whatever the request with this zero-based index was granted.
    Free(usize),
}

impl Request {
    /// Decode the signed form: `v > 0` allocates `v` units, `-k` frees the
    /// allocation made by the `k`-th (one-based) request. `0` is not a
    /// request.
    pub fn from_signed(value: i64) -> Option<Self> {
        if value > 0 {
            usize::try_from(value).ok().map(Self::Allocate)
        } else if value < 0 {
            usize::try_from(value.unsigned_abs() - 1)
                .ok()
                .map(Self::Free)
        } else {
            None
        }
    }

    /// The inverse of [`Self::from_signed`]. Returns `None` for requests with
    /// no signed form: `Allocate(0)` and anything that doesn't fit in `i64`.
    pub fn to_signed(self) -> Option<i64> {
        match self {
            Self::Allocate(0) => None,
            Self::Allocate(size) => i64::try_from(size).ok(),
            Self::Free(request) => i64::try_from(request).ok().map(|k| -k - 1),
        }
    }
}

/// Something that services allocation requests the largest-fit way.
///
/// Implementors must give every request, allocation or free, its own history
/// slot so that `Free(i)` refers to the `i`-th request ever made.
pub trait RequestSink {
    /// Returns the zero-based starting offset, or `None` on failure.
    fn allocate(&mut self, size: usize) -> Option<usize>;

    /// Returns `false` if there was nothing to free.
    fn free(&mut self, request: usize) -> bool;

    /// Apply `request`. Yields an outcome for allocations only.
    fn apply(&mut self, request: Request) -> Option<Option<usize>> {
        match request {
            Request::Allocate(size) => Some(self.allocate(size)),
            Request::Free(request) => {
                self.free(request);
                None
            }
        }
    }
}

impl RequestSink for LargestFit {
    #[inline]
    fn allocate(&mut self, size: usize) -> Option<usize> {
        LargestFit::allocate(self, size)
    }

    #[inline]
    fn free(&mut self, request: usize) -> bool {
        LargestFit::free(self, request)
    }
}

/// Feed a signed request stream to `sink` and collect one result per
/// allocation: the one-based starting address, or [`FAILURE`].
///
/// Zero values are skipped without consuming a history slot.
pub fn run<S: RequestSink + ?Sized>(
    sink: &mut S,
    requests: impl IntoIterator<Item = i64>,
) -> Vec<i64> {
    requests
        .into_iter()
        .filter_map(Request::from_signed)
        .filter_map(|request| sink.apply(request))
        .map(|outcome| outcome.map_or(FAILURE, |start| start as i64 + 1))
        .collect()
}

/// Run `requests` against a fresh [`LargestFit`] over `arena_size` units.
///
/// # Examples
///
/// ```
/// assert_eq!(lfalloc::solve(10, &[5, 3, -1, 4]), [1, 6, 1]);
/// assert_eq!(lfalloc::solve(3, &[4]), [-1]);
/// ```
pub fn solve(arena_size: usize, requests: &[i64]) -> Vec<i64> {
    run(&mut LargestFit::new(arena_size), requests.iter().copied())
}

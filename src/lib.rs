//! This crate simulates a largest-fit allocator over a fixed-size linear
//! arena.
//!
//!  - **Every allocation is carved from the largest free segment.** Among
//!    equally large free segments, the one with the lowest address wins.
//!
//!  - **Allocation and deallocation complete in logarithmic time.** Free
//!    segments are kept in an indexed max-heap, so the best candidate is
//!    always at the root and any segment can be re-sifted without a search.
//!
//!  - **Freed memory is coalesced immediately.** No two adjacent segments
//!    are ever both free.
//!
//!  - **This crate supports `#![no_std]`.** It only needs `alloc`.
//!
//! The arena is abstract: addresses are plain unit offsets and no memory is
//! actually handed out. A slow [`oracle::LinearScan`] implementing the same
//! contract is provided for cross-checking.
//!
//! # Examples
//!
//! ## `LargestFit`: Core API
//!
//! ```rust
//! use lfalloc::LargestFit;
//!
//! let mut alloc = LargestFit::new(10);
//!
//! // Request #0 and #1
//! assert_eq!(alloc.allocate(5), Some(0));
//! assert_eq!(alloc.allocate(3), Some(5));
//! assert_eq!(alloc.largest_free(), Some(8..10));
//!
//! // Request #2 releases whatever request #0 was granted
//! assert!(alloc.free(0));
//! assert_eq!(alloc.largest_free(), Some(0..5));
//!
//! // Request #3
//! assert_eq!(alloc.allocate(4), Some(0));
//! assert_eq!(alloc.allocate(4), None);
//! ```
//!
//! ## `solve`: Signed Request Streams
//!
//! Positive values allocate, `-k` frees the allocation made by the `k`-th
//! request (one-based, free requests included). One result is produced per
//! allocation: the one-based starting address or `-1`.
//!
//! ```rust
//! assert_eq!(lfalloc::solve(4, &[2, 2, -1, -2, 4]), [1, 3, 1]);
//! assert_eq!(lfalloc::oracle::solve(4, &[2, 2, -1, -2, 4]), [1, 3, 1]);
//! ```
//!
#![no_std]

extern crate alloc;

mod heap;
mod largest_fit;
pub mod oracle;
mod partition;
mod request;
pub use self::{
    largest_fit::{LargestFit, SegmentInfo},
    request::{run, solve, Request, RequestSink, FAILURE},
};

#[cfg(test)]
extern crate std;

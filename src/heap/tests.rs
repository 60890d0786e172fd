extern crate std;

use quickcheck_macros::quickcheck;
use std::{prelude::v1::*, vec};

use super::*;

/// `(start, len)` per handle, ranked the largest-fit way.
struct Keys(Vec<(usize, usize)>);

impl Ranking for Keys {
    fn outranks(&self, a: SegmentId, b: SegmentId) -> bool {
        let (a, b) = (self.0[a.0], self.0[b.0]);
        a.1 > b.1 || (a.1 == b.1 && a.0 < b.0)
    }
}

fn check(heap: &FreeHeap, keys: &Keys) {
    for (pos, id) in heap.iter().enumerate() {
        assert_eq!(heap.position_of(id), Some(pos), "stale position of {:?}", id);
        if pos > 0 {
            let parent = heap.entries[(pos - 1) / 2];
            assert!(
                !keys.outranks(id, parent),
                "{:?} at {} outranks its parent {:?}",
                id,
                pos,
                parent
            );
        }
    }
}

fn filled(keys: &Keys) -> FreeHeap {
    let mut heap = FreeHeap::new();
    for i in 0..keys.0.len() {
        heap.insert(SegmentId(i), keys);
        check(&heap, keys);
    }
    heap
}

#[test]
fn empty() {
    let keys = Keys(vec![]);
    let mut heap = FreeHeap::new();
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek(), None);
    assert_eq!(heap.remove_at(0, &keys), None);
    assert_eq!(heap.position_of(SegmentId(3)), None);
}

#[test]
fn peek_largest() {
    let keys = Keys(vec![(0, 3), (10, 7), (20, 5), (30, 1)]);
    let heap = filled(&keys);
    assert_eq!(heap.len(), 4);
    assert_eq!(heap.peek(), Some(SegmentId(1)));
}

#[test]
fn peek_ties_to_lowest_start() {
    let keys = Keys(vec![(40, 6), (30, 6), (10, 6), (20, 6)]);
    let heap = filled(&keys);
    assert_eq!(heap.peek(), Some(SegmentId(2)));
}

#[test]
fn remove_at_drains_in_rank_order() {
    let keys = Keys(vec![(0, 2), (5, 9), (20, 4), (30, 9), (50, 1), (60, 4)]);
    let mut heap = filled(&keys);

    let mut order = Vec::new();
    while let Some(id) = heap.remove_at(0, &keys) {
        check(&heap, &keys);
        assert_eq!(heap.position_of(id), None);
        order.push(id.0);
    }
    assert_eq!(order, vec![1, 3, 2, 5, 0, 4]);
}

#[test]
fn remove_at_arbitrary_position() {
    let keys = Keys((0..16).map(|i| (i * 100, (i * 7) % 11 + 1)).collect());
    let mut heap = filled(&keys);

    for victim in [5, 0, 11, 15, 3] {
        let pos = heap.position_of(SegmentId(victim)).unwrap();
        assert_eq!(heap.remove_at(pos, &keys), Some(SegmentId(victim)));
        assert_eq!(heap.position_of(SegmentId(victim)), None);
        check(&heap, &keys);
    }
    assert_eq!(heap.len(), 11);
}

#[test]
fn restore_after_decrease() {
    let mut keys = Keys(vec![(0, 10), (20, 8), (40, 6), (60, 4)]);
    let mut heap = filled(&keys);
    assert_eq!(heap.peek(), Some(SegmentId(0)));

    // Carve 5 units off the root
    keys.0[0] = (5, 5);
    heap.restore_after_decrease(0, &keys);
    check(&heap, &keys);
    assert_eq!(heap.peek(), Some(SegmentId(1)));
}

#[test]
fn restore_after_increase() {
    let mut keys = Keys(vec![(0, 10), (20, 8), (40, 6), (60, 4)]);
    let mut heap = filled(&keys);

    // Grow the smallest entry leftwards
    keys.0[3] = (50, 14);
    let pos = heap.position_of(SegmentId(3)).unwrap();
    heap.restore_after_increase(pos, &keys);
    check(&heap, &keys);
    assert_eq!(heap.peek(), Some(SegmentId(3)));
}

#[quickcheck]
fn random(bytecode: Vec<u8>) {
    random_inner(bytecode);
}

fn random_inner(bytecode: Vec<u8>) -> Option<()> {
    let mut keys = Keys(Vec::new());
    let mut heap = FreeHeap::new();
    let mut queued: Vec<SegmentId> = Vec::new();

    let mut it = bytecode.iter().cloned();
    loop {
        match it.next()? % 3 {
            0 => {
                let id = SegmentId(keys.0.len());
                keys.0.push((it.next()? as usize, it.next()? as usize % 16));
                log::trace!("insert {:?} = {:?}", id, keys.0[id.0]);
                heap.insert(id, &keys);
                queued.push(id);
            }
            1 => {
                let i = it.next()? as usize;
                if !queued.is_empty() {
                    let id = queued.swap_remove(i % queued.len());
                    log::trace!("remove {:?}", id);
                    let pos = heap.position_of(id).unwrap();
                    assert_eq!(heap.remove_at(pos, &keys), Some(id));
                }
            }
            2 => {
                let i = it.next()? as usize;
                let delta = it.next()? as usize % 8;
                if !queued.is_empty() {
                    let id = queued[i % queued.len()];
                    let pos = heap.position_of(id).unwrap();
                    let (start, len) = keys.0[id.0];
                    if delta % 2 == 0 {
                        keys.0[id.0] = (start, len + delta);
                        heap.restore_after_increase(pos, &keys);
                    } else {
                        keys.0[id.0] = (start + delta, len.saturating_sub(delta));
                        heap.restore_after_decrease(pos, &keys);
                    }
                }
            }
            _ => unreachable!(),
        }

        check(&heap, &keys);
        assert_eq!(heap.len(), queued.len());

        // The root must be the best of everything queued
        let best = queued
            .iter()
            .copied()
            .fold(None, |best: Option<SegmentId>, id| match best {
                Some(b) if !keys.outranks(id, b) => Some(b),
                _ => Some(id),
            });
        // (Distinct handles may share a key)
        assert_eq!(
            heap.peek().map(|id| keys.0[id.0]),
            best.map(|id| keys.0[id.0])
        );
    }
}

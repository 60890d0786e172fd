use lfalloc::{oracle, LargestFit, Request, RequestSink, SegmentInfo, FAILURE};

#[test]
fn scenario_a() {
    assert_eq!(lfalloc::solve(10, &[5, 3, -1, 4]), [1, 6, 1]);
}

#[test]
fn scenario_b() {
    assert_eq!(lfalloc::solve(3, &[4]), [FAILURE]);
}

#[test]
fn scenario_c() {
    assert_eq!(lfalloc::solve(4, &[2, 2, -1, -2, 4]), [1, 3, 1]);
}

#[test]
fn frees_produce_no_results() {
    assert_eq!(lfalloc::solve(8, &[-1, -1, -5]), Vec::<i64>::new());
    assert_eq!(lfalloc::solve(8, &[]), Vec::<i64>::new());
}

#[test]
fn request_decoding() {
    assert_eq!(Request::from_signed(7), Some(Request::Allocate(7)));
    assert_eq!(Request::from_signed(-1), Some(Request::Free(0)));
    assert_eq!(Request::from_signed(-12), Some(Request::Free(11)));
    assert_eq!(Request::from_signed(0), None);
    assert_eq!(Request::Free(11).to_signed(), Some(-12));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn request_encoding_out_of_range() {
    assert_eq!(Request::Allocate(0).to_signed(), None);
    assert_eq!(Request::Allocate(usize::MAX).to_signed(), None);
    assert_eq!(Request::Free(usize::MAX).to_signed(), None);

    // Extremes that still fit
    assert_eq!(Request::Free(i64::MAX as usize).to_signed(), Some(i64::MIN));
    assert_eq!(
        Request::from_signed(i64::MIN),
        Some(Request::Free(i64::MAX as usize))
    );
    assert_eq!(Request::Allocate(i64::MAX as usize).to_signed(), Some(i64::MAX));
}

/// Counts what passes through to the wrapped sink.
struct Counting<S> {
    inner: S,
    allocs: usize,
    frees: usize,
}

impl<S: RequestSink> RequestSink for Counting<S> {
    fn allocate(&mut self, size: usize) -> Option<usize> {
        self.allocs += 1;
        self.inner.allocate(size)
    }

    fn free(&mut self, request: usize) -> bool {
        self.frees += 1;
        self.inner.free(request)
    }
}

#[test]
fn run_custom_sink() {
    let mut sink = Counting {
        inner: LargestFit::new(10),
        allocs: 0,
        frees: 0,
    };
    let results = lfalloc::run(&mut sink, vec![5, 0, 3, -1, 4, -1]);
    assert_eq!(results, [1, 6, 1]);
    assert_eq!((sink.allocs, sink.frees), (3, 2));

    let segments: Vec<SegmentInfo> = sink.inner.segments().collect();
    assert_eq!(
        segments,
        [
            SegmentInfo { range: 0..4, free: false },
            SegmentInfo { range: 4..5, free: true },
            SegmentInfo { range: 5..8, free: false },
            SegmentInfo { range: 8..10, free: true },
        ]
    );
}

#[test]
fn oracle_matches_on_dense_workload() {
    let mut requests = Vec::new();
    let mut state = 0x12345689u32;
    for i in 0..2000i64 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let value = (state % 61) as i64 - 20;
        requests.push(if value < 0 { -(value.abs() % (i + 1) + 1) } else { value });
    }

    for arena_size in [1, 7, 64, 300] {
        assert_eq!(
            lfalloc::solve(arena_size, &requests),
            oracle::solve(arena_size, &requests),
            "arena_size = {}",
            arena_size
        );
    }
}

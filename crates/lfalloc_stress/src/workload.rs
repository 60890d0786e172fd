//! Random request streams
use crate::config::StressConfig;

struct Xorshift32(u32);

impl Xorshift32 {
    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }
}

/// Uniform draws from `-range..=range`.
pub struct Draws {
    rng: Xorshift32,
    range: i64,
}

impl Draws {
    pub fn new(seed: u32, range: i64) -> Self {
        debug_assert!(range > 0);
        // xorshift gets stuck at zero
        Self {
            rng: Xorshift32(if seed == 0 { 0x12345689 } else { seed }),
            range,
        }
    }

    pub fn draw(&mut self) -> i64 {
        let span = (2 * self.range + 1) as u64;
        let x = (((self.rng.next() as u64) << 32) | self.rng.next() as u64) % span;
        x as i64 - self.range
    }
}

/// One arena and the requests to run against it.
#[derive(Debug, Clone)]
pub struct Round {
    pub arena_size: usize,
    pub requests: Vec<i64>,
}

/// Generate a round.
///
/// A negative draw becomes a free request naming some earlier request (or
/// nothing, for the very first one), a non-negative one an allocation of up
/// to the arena size. Zero is bumped to one either way.
pub fn round(draws: &mut Draws, config: &StressConfig) -> Round {
    let arena_size = (draws.draw().abs() % config.max_arena).max(1);
    let count = draws.draw().abs() % config.max_requests;

    let mut requests: Vec<i64> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut value = draws.draw() % arena_size;
        if value < 0 && !requests.is_empty() {
            value %= requests.len() as i64;
        } else {
            value = value.abs();
        }
        if value == 0 {
            value = 1;
        }
        requests.push(value);
    }

    Round {
        arena_size: arena_size as usize,
        requests,
    }
}

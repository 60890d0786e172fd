//! Runs randomized request streams through [`lfalloc`], times them, and
//! cross-checks the results against the linear-scan oracle.
//!
//! Set `RUST_LOG=debug` for per-round output. See [`config::StressConfig`]
//! for the other knobs.
use std::{
    process,
    time::{Duration, Instant},
};

use lfalloc::{oracle, FAILURE};

mod config;
mod workload;

use self::config::StressConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = StressConfig::from_env();
    log::info!("{:?}", config);

    let mut draws = workload::Draws::new(config.seed, config.draw_range);
    let mut fast_time = Duration::ZERO;
    let mut slow_time = Duration::ZERO;
    let mut num_requests = 0;

    for round_i in 0..config.rounds {
        let round = workload::round(&mut draws, &config);
        num_requests += round.requests.len();

        let start = Instant::now();
        let got = lfalloc::solve(round.arena_size, &round.requests);
        fast_time += start.elapsed();

        log::debug!(
            "round {}: arena_size = {}, {} requests, {} failed allocations",
            round_i,
            round.arena_size,
            round.requests.len(),
            got.iter().filter(|&&x| x == FAILURE).count()
        );

        if !config.check {
            continue;
        }

        let start = Instant::now();
        let expected = oracle::solve(round.arena_size, &round.requests);
        slow_time += start.elapsed();

        if let Err(mismatch) = compare(&got, &expected) {
            log::error!(
                "round {} (arena_size = {}): {}",
                round_i,
                round.arena_size,
                mismatch
            );
            log::debug!("requests = {:?}", round.requests);
            process::exit(1);
        }
    }

    log::info!(
        "{} rounds, {} requests: largest_fit took {} ms",
        config.rounds,
        num_requests,
        fast_time.as_millis()
    );
    if config.check {
        log::info!("linear_scan took {} ms; all results agree", slow_time.as_millis());
    }
}

/// Find the first allocation whose outcome differs.
fn compare(got: &[i64], expected: &[i64]) -> Result<(), String> {
    if got.len() != expected.len() {
        return Err(format!(
            "{} results, expected {}",
            got.len(),
            expected.len()
        ));
    }

    match got.iter().zip(expected).position(|(g, e)| g != e) {
        None => Ok(()),
        Some(i) => {
            let kind = if (got[i] == FAILURE) != (expected[i] == FAILURE) {
                "feasibility"
            } else {
                "offset"
            };
            Err(format!(
                "{} mismatch at allocation #{}: got {}, expected {}",
                kind,
                i + 1,
                got[i],
                expected[i]
            ))
        }
    }
}

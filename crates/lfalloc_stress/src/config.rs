//! Stress run parameters
use std::{env, fmt::Debug, str::FromStr};

/// Parameters of a stress run. Every field can be overridden by an
/// environment variable; see [`StressConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressConfig {
    /// `LFALLOC_SEED`
    pub seed: u32,
    /// `LFALLOC_ROUNDS`
    pub rounds: usize,
    /// `LFALLOC_MAX_ARENA`: arena sizes are drawn from `1..max_arena`
    pub max_arena: i64,
    /// `LFALLOC_MAX_REQUESTS`: request counts are drawn from
    /// `0..max_requests`
    pub max_requests: i64,
    /// `LFALLOC_DRAW_RANGE`: raw draws are uniform over
    /// `-draw_range..=draw_range`
    pub draw_range: i64,
    /// `LFALLOC_CHECK`: cross-check every round against the oracle
    pub check: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            seed: 72874,
            rounds: 5000,
            max_arena: 10000,
            max_requests: 10000,
            draw_range: 10000,
            check: true,
        }
    }
}

impl StressConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from a key-value source. Missing keys take the
    /// default; malformed or out-of-range values are reported and replaced
    /// by the default.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            seed: parse(&mut lookup, "LFALLOC_SEED", default.seed, |_| true),
            rounds: parse(&mut lookup, "LFALLOC_ROUNDS", default.rounds, |_| true),
            max_arena: parse(&mut lookup, "LFALLOC_MAX_ARENA", default.max_arena, |&x| x > 0),
            max_requests: parse(
                &mut lookup,
                "LFALLOC_MAX_REQUESTS",
                default.max_requests,
                |&x| x > 0,
            ),
            draw_range: parse(
                &mut lookup,
                "LFALLOC_DRAW_RANGE",
                default.draw_range,
                |&x| x > 0 && x <= i64::from(i32::MAX),
            ),
            check: parse_flag(&mut lookup, "LFALLOC_CHECK", default.check),
        }
    }
}

fn parse<T: FromStr + Debug>(
    lookup: &mut impl FnMut(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let raw = match lookup(key) {
        Some(raw) => raw,
        None => return default,
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            log::warn!("ignoring {}={:?}; using {:?}", key, raw, default);
            default
        }
    }
}

fn parse_flag(lookup: &mut impl FnMut(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let raw = match lookup(key) {
        Some(raw) => raw,
        None => return default,
    };
    match raw.trim() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            log::warn!("ignoring {}={:?}; using {:?}", key, raw, default);
            default
        }
    }
}

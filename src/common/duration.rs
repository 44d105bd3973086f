use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

/// Parses a giveaway timer string such as `10s`, `5m`, `1h` or `1d`.
///
/// The grammar is deliberately strict: a single positive integer followed by
/// a single unit letter. Anything else, including `0s` and unknown units,
/// is rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    lazy_static! {
        static ref DURATION_REGEX: Regex = Regex::new(r"^(\d+)([smhd])$").unwrap();
    }

    let captures = DURATION_REGEX.captures(input)?;
    let value = captures.get(1)?.as_str().parse::<u64>().ok()?;
    if value == 0 {
        return None;
    }

    let unit_milliseconds: u64 = match captures.get(2)?.as_str() {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        _ => return None,
    };

    Some(Duration::from_millis(value.checked_mul(unit_milliseconds)?))
}

//! Duration strings for token lifetimes (`30s`, `15m`, `2h`, `7d`).

use std::time::Duration;

/// Lifetime used whenever a TTL string cannot be parsed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// Longest lifetime accepted from configuration (100 years). Anything longer
/// could not be stamped into an `exp` claim.
pub const MAX_TTL: Duration = Duration::from_secs(36_500 * 24 * 60 * 60);

/// Parse `<integer><unit>` with unit one of `s`, `m`, `h`, `d`.
///
/// Anything else, including values above [`MAX_TTL`], yields [`DEFAULT_TTL`].
pub fn parse_ttl(raw: &str) -> Duration {
    match try_parse_ttl(raw) {
        Some(ttl) => ttl,
        None => {
            tracing::warn!(value = raw, "unrecognised ttl; using default of 900s");
            DEFAULT_TTL
        }
    }
}

fn try_parse_ttl(raw: &str) -> Option<Duration> {
    let unit = raw.chars().last()?;
    let digits = &raw[..raw.len() - unit.len_utf8()];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 60 * 60 * 24,
        _ => return None,
    };

    let value: u64 = digits.parse().ok()?;
    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .filter(|ttl| *ttl <= MAX_TTL)
}

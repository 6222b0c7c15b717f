//! REST fetchers for the three live indicator sources. Each fetcher is a
//! thin reqwest call plus a parse function over the raw JSON; parse functions
//! are split out so payload handling is testable without a network.

pub mod ath;
pub mod dominance;
pub mod fear_greed;

pub use ath::fetch_ath_stats;
pub use dominance::fetch_btc_dominance;
pub use fear_greed::fetch_fear_greed;

/// Parse an RFC 3339 / ISO 8601 UTC timestamp string to unix seconds.
/// Tolerates fractional seconds, a trailing `Z`, and offset suffixes on
/// full timestamps; bare `YYYY-MM-DD` dates parse as midnight UTC.
pub fn parse_iso_to_unix_secs(s: &str) -> Option<i64> {
    let s = s.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);
    let s = if let Some(dot) = s.find('.') { &s[..dot] } else { s };
    let s = if s.len() > 19 {
        let b = s.as_bytes()[19];
        if b == b'+' || b == b'-' { &s[..19] } else { s }
    } else {
        s
    };
    let (year, month, day, hour, minute, second): (i64, i64, i64, i64, i64, i64) = if s.len() == 10
    {
        (
            s[0..4].parse().ok()?,
            s[5..7].parse().ok()?,
            s[8..10].parse().ok()?,
            0,
            0,
            0,
        )
    } else if s.len() >= 19 {
        (
            s[0..4].parse().ok()?,
            s[5..7].parse().ok()?,
            s[8..10].parse().ok()?,
            s[11..13].parse().ok()?,
            s[14..16].parse().ok()?,
            s[17..19].parse().ok()?,
        )
    } else {
        return None;
    };

    // Civil date → Julian day number → unix days.
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    let unix_days = jdn - 2_440_588;
    Some(unix_days * 86_400 + hour * 3600 + minute * 60 + second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_timestamp_with_fraction_and_zone() {
        // The 2021 BTC ATH instant as CoinGecko reports it.
        let secs = parse_iso_to_unix_secs("2021-11-10T14:24:11.849Z").unwrap();
        assert_eq!(secs, 1_636_554_251);
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        assert_eq!(parse_iso_to_unix_secs("2024-04-20"), Some(1_713_571_200));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_iso_to_unix_secs("not a date"), None);
        assert_eq!(parse_iso_to_unix_secs(""), None);
    }
}

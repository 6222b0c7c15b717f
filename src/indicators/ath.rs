use crate::error::{AppError, Result};
use crate::indicators::parse_iso_to_unix_secs;
use crate::season::halving::SECS_PER_DAY;
use crate::types::AthStats;

/// Fetch BTC market data from CoinGecko and derive the all-time-high metrics.
pub async fn fetch_ath_stats(
    client: &reqwest::Client,
    base_url: &str,
    now_secs: i64,
) -> Result<AthStats> {
    let url = format!(
        "{base_url}/api/v3/coins/bitcoin?localization=false&tickers=false&market_data=true\
         &community_data=false&developer_data=false&sparkline=false"
    );
    let resp: serde_json::Value = client.get(&url).send().await?.json().await?;
    parse_ath_stats(&resp, now_secs)
        .ok_or_else(|| AppError::Fetch("coin response missing market_data ath fields".to_string()))
}

/// Derive drawdown/recovery/age from a `/coins/bitcoin` payload.
///
/// Drawdown is floored at 0 and recovery capped at 100 — after a fresh
/// all-time high the reported `ath.usd` can briefly lag the live price.
pub fn parse_ath_stats(v: &serde_json::Value, now_secs: i64) -> Option<AthStats> {
    let market_data = v.get("market_data")?;
    let current = market_data.get("current_price")?.get("usd")?.as_f64()?;
    let ath = market_data.get("ath")?.get("usd")?.as_f64()?;
    if ath <= 0.0 || current < 0.0 {
        return None;
    }

    let recovery_pct = (current / ath * 100.0).min(100.0);
    let drawdown_pct = (100.0 - recovery_pct).max(0.0);

    let days_since_ath = market_data
        .get("ath_date")
        .and_then(|d| d.get("usd"))
        .and_then(|d| d.as_str())
        .and_then(parse_iso_to_unix_secs)
        .map(|ath_secs| (now_secs - ath_secs).div_euclid(SECS_PER_DAY).max(0))
        .unwrap_or(0);

    Some(AthStats {
        drawdown_pct,
        recovery_pct,
        days_since_ath,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(current: f64, ath: f64, ath_date: &str) -> serde_json::Value {
        json!({
            "id": "bitcoin",
            "market_data": {
                "current_price": {"usd": current},
                "ath": {"usd": ath},
                "ath_date": {"usd": ath_date}
            }
        })
    }

    #[test]
    fn derives_drawdown_and_recovery() {
        // 300 days after an ATH of 100k with price at 60k.
        let ath_secs = 1_700_000_000i64;
        let now = ath_secs + 300 * SECS_PER_DAY;
        let v = payload(60_000.0, 100_000.0, "2023-11-14T22:13:20.000Z");
        let stats = parse_ath_stats(&v, now).unwrap();
        assert!((stats.drawdown_pct - 40.0).abs() < 1e-9);
        assert!((stats.recovery_pct - 60.0).abs() < 1e-9);
        assert_eq!(stats.days_since_ath, 300);
    }

    #[test]
    fn fresh_high_clamps_to_zero_drawdown() {
        // Live price above the lagging reported ATH.
        let v = payload(101_000.0, 100_000.0, "2023-11-14T22:13:20.000Z");
        let stats = parse_ath_stats(&v, 1_700_000_000 + SECS_PER_DAY).unwrap();
        assert_eq!(stats.drawdown_pct, 0.0);
        assert_eq!(stats.recovery_pct, 100.0);
    }

    #[test]
    fn unparseable_ath_date_defaults_to_zero_days() {
        let v = payload(60_000.0, 100_000.0, "???");
        let stats = parse_ath_stats(&v, 1_700_000_000).unwrap();
        assert_eq!(stats.days_since_ath, 0);
    }

    #[test]
    fn missing_market_data_yields_none() {
        assert!(parse_ath_stats(&json!({"id": "bitcoin"}), 0).is_none());
        let v = json!({"market_data": {"current_price": {"usd": 1.0}, "ath": {"usd": 0.0}}});
        assert!(parse_ath_stats(&v, 0).is_none());
    }
}

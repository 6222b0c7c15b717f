use crate::error::{AppError, Result};

/// Fetch BTC dominance (percentage of total crypto market cap) from the
/// CoinGecko global endpoint.
pub async fn fetch_btc_dominance(client: &reqwest::Client, base_url: &str) -> Result<f64> {
    let url = format!("{base_url}/api/v3/global");
    let resp: serde_json::Value = client.get(&url).send().await?.json().await?;
    parse_btc_dominance(&resp).ok_or_else(|| {
        AppError::Fetch("global response missing data.market_cap_percentage.btc".to_string())
    })
}

/// Extract `data.market_cap_percentage.btc` from a `/global` payload.
pub fn parse_btc_dominance(v: &serde_json::Value) -> Option<f64> {
    v.get("data")?
        .get("market_cap_percentage")?
        .get("btc")?
        .as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dominance_percentage() {
        let payload = json!({
            "data": {
                "active_cryptocurrencies": 17000,
                "market_cap_percentage": {"btc": 54.23, "eth": 12.9}
            }
        });
        assert_eq!(parse_btc_dominance(&payload), Some(54.23));
    }

    #[test]
    fn missing_btc_entry_yields_none() {
        let payload = json!({"data": {"market_cap_percentage": {"eth": 12.9}}});
        assert_eq!(parse_btc_dominance(&payload), None);
        assert_eq!(parse_btc_dominance(&json!({})), None);
    }
}

use crate::error::{AppError, Result};

/// Fetch the latest Fear & Greed index reading from the alternative.me API.
/// Returns a value in [0, 100].
pub async fn fetch_fear_greed(client: &reqwest::Client, base_url: &str) -> Result<f64> {
    let url = format!("{base_url}/fng/?limit=1&format=json");
    let resp: serde_json::Value = client.get(&url).send().await?.json().await?;
    parse_fear_greed(&resp)
        .ok_or_else(|| AppError::Fetch("fng response missing data[0].value".to_string()))
}

/// Extract the index value from an `/fng/` payload. The API reports the value
/// as a string ("39"); accept a bare number too.
pub fn parse_fear_greed(v: &serde_json::Value) -> Option<f64> {
    let value = v.get("data")?.as_array()?.first()?.get("value")?;
    let parsed = value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())?;
    Some(parsed.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_stringly_typed_value() {
        let payload = json!({
            "name": "Fear and Greed Index",
            "data": [{"value": "39", "value_classification": "Fear", "timestamp": "1551157200"}],
            "metadata": {"error": null}
        });
        assert_eq!(parse_fear_greed(&payload), Some(39.0));
    }

    #[test]
    fn accepts_numeric_value() {
        let payload = json!({"data": [{"value": 72}]});
        assert_eq!(parse_fear_greed(&payload), Some(72.0));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let payload = json!({"data": [{"value": "140"}]});
        assert_eq!(parse_fear_greed(&payload), Some(100.0));
    }

    #[test]
    fn missing_data_yields_none() {
        assert_eq!(parse_fear_greed(&json!({"data": []})), None);
        assert_eq!(parse_fear_greed(&json!({})), None);
    }
}

use crate::errors::{AnalysisError, AnalysisResult};
use crate::storage_utils::MarketConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// One `[timestamp_ms, price]` sample from the market-chart payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

#[derive(Deserialize)]
struct MarketChartResponse {
    prices: Vec<Vec<Value>>,
}

/// Anything that can hand the pipeline a price history.
#[async_trait]
pub trait MarketDataSource {
    async fn fetch_prices(&self) -> AnalysisResult<Vec<PricePoint>>;
}

pub struct CoinGeckoClient {
    client: Client,
    config: MarketConfig,
}

impl CoinGeckoClient {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/coins/{}/market_chart",
            self.config.base_url.trim_end_matches('/'),
            self.config.coin_id
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.config.vs_currency.clone()),
            ("days", self.config.days.to_string()),
            ("interval", self.config.interval.clone()),
        ]
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_prices(&self) -> AnalysisResult<Vec<PricePoint>> {
        let url = self.url();
        debug!(%url, "requesting market chart");

        let response = self.client.get(&url).query(&self.query()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AnalysisError::FetchStatus { status });
        }

        let body = response.text().await?;
        let points = parse_market_chart(&body)?;
        info!(
            "Fetched {} price points for {}/{}",
            points.len(),
            self.config.coin_id,
            self.config.vs_currency
        );
        Ok(points)
    }
}

/// Extracts the `prices` series from a market-chart JSON body.
pub fn parse_market_chart(body: &str) -> AnalysisResult<Vec<PricePoint>> {
    let chart: MarketChartResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let points = chart
        .prices
        .iter()
        .enumerate()
        .map(|(i, raw)| to_price_point(i, raw))
        .collect::<AnalysisResult<Vec<_>>>()?;

    if points.is_empty() {
        return Err(AnalysisError::Parse("no prices in response".to_string()));
    }
    Ok(points)
}

fn to_price_point(index: usize, raw: &[Value]) -> AnalysisResult<PricePoint> {
    let malformed = || AnalysisError::Parse(format!("malformed price point at index {}", index));

    match raw {
        [ts, price] => {
            // CoinGecko sends integer millis, but a float form is still a valid number.
            let timestamp_ms = ts
                .as_i64()
                .or_else(|| ts.as_f64().map(|f| f as i64))
                .ok_or_else(malformed)?;
            let price = price.as_f64().ok_or_else(malformed)?;
            Ok(PricePoint { timestamp_ms, price })
        }
        _ => Err(malformed()),
    }
}

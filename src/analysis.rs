//! This module contains the core analysis pipeline logic.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::indicators::{self, FibonacciLevels, Fractal};
use crate::market_chart::{MarketDataSource, PricePoint};
use crate::recommendation::{self, Recommendation};
use crate::report;
use crate::storage_utils::AsyncStorageManager;
use std::path::PathBuf;
use tracing::{debug, info};

/// Run-level indicator results for one price series.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub current_price: f64,
    pub fib_levels: FibonacciLevels,
    pub rsi: f64,
    pub rolling_rsi: Option<f64>,
    pub fractals: Vec<Fractal>,
    pub recommendation: Recommendation,
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub filename: String,
    pub path: PathBuf,
    pub row_count: usize,
    pub analysis: Analysis,
}

/// Indicators and recommendation for `prices`; `None` if the series is empty.
pub fn analyze(prices: &[f64], rsi_period: usize) -> Option<Analysis> {
    let current_price = *prices.last()?;
    let fib_levels = indicators::fibonacci_levels(prices)?;
    let rsi = indicators::calculate_rsi(prices, rsi_period);
    let fractals = indicators::fractal_analysis(prices);
    let recommendation = recommendation::make_recommendation(rsi, current_price, &fib_levels);

    Some(Analysis {
        current_price,
        fib_levels,
        rsi,
        rolling_rsi: indicators::rolling_rsi(prices, rsi_period),
        fractals,
        recommendation,
    })
}

/// Runs the full analysis pipeline:
/// 1. Fetches the price history from `source`.
/// 2. Computes Fibonacci levels, RSI and fractals.
/// 3. Derives the recommendation.
/// 4. Writes the CSV report under a name built from `make_token`.
pub async fn run_analysis_pipeline<S, F>(
    source: &S,
    storage: &AsyncStorageManager,
    rsi_period: usize,
    make_token: F,
) -> AnalysisResult<AnalysisOutcome>
where
    S: MarketDataSource + ?Sized,
    F: FnOnce() -> String,
{
    // Step 1: Fetch
    let points: Vec<PricePoint> = source.fetch_prices().await?;
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();

    // Step 2 + 3: Indicators and recommendation
    let analysis = analyze(&prices, rsi_period)
        .ok_or_else(|| AnalysisError::Parse("no prices in response".to_string()))?;
    info!(
        rsi = analysis.rsi,
        current_price = analysis.current_price,
        recommendation = %analysis.recommendation,
        "Computed indicators"
    );
    debug!(fractals = analysis.fractals.len(), "fractal scan done");

    // Step 4: Report
    let rows = report::build_rows(
        &points,
        analysis.rsi,
        &analysis.fib_levels,
        analysis.recommendation,
    )?;
    let filename = report::report_filename(&make_token());
    let path = report::save_report(storage, &filename, &rows).await?;
    info!(?path, rows = rows.len(), "Report written");

    Ok(AnalysisOutcome {
        filename,
        path,
        row_count: rows.len(),
        analysis,
    })
}

/// 32 lowercase hex characters.
pub fn random_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

use serde::Serialize;
use ta::Next;
use ta::indicators::RelativeStrengthIndex;

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub const FIB_LABELS: [&str; 6] = ["0%", "23.6%", "38.2%", "50%", "61.8%", "100%"];

/// Retracement levels between the low and the high of a price window.
///
/// Serializes as a JSON object whose keys follow `FIB_LABELS` order.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevels {
    #[serde(rename = "0%")]
    pub level_0: f64,
    #[serde(rename = "23.6%")]
    pub level_236: f64,
    #[serde(rename = "38.2%")]
    pub level_382: f64,
    #[serde(rename = "50%")]
    pub level_500: f64,
    #[serde(rename = "61.8%")]
    pub level_618: f64,
    #[serde(rename = "100%")]
    pub level_1000: f64,
}

impl FibonacciLevels {
    /// `(label, value)` pairs from "0%" to "100%".
    pub fn labelled(&self) -> [(&'static str, f64); 6] {
        [
            (FIB_LABELS[0], self.level_0),
            (FIB_LABELS[1], self.level_236),
            (FIB_LABELS[2], self.level_382),
            (FIB_LABELS[3], self.level_500),
            (FIB_LABELS[4], self.level_618),
            (FIB_LABELS[5], self.level_1000),
        ]
    }
}

/// Returns `None` for an empty slice.
pub fn fibonacci_levels(prices: &[f64]) -> Option<FibonacciLevels> {
    let high = prices.iter().copied().reduce(f64::max)?;
    let low = prices.iter().copied().reduce(f64::min)?;
    let diff = high - low;

    Some(FibonacciLevels {
        level_0: low,
        level_236: high - 0.236 * diff,
        level_382: high - 0.382 * diff,
        level_500: (high + low) / 2.0,
        level_618: high - 0.618 * diff,
        level_1000: high,
    })
}

/// Single RSI value over the whole window.
///
/// `_period` is accepted for call-site compatibility with a rolling RSI but the
/// ratio is taken over every consecutive delta in `prices`. A window without
/// any down move (including a single price) yields 100.
pub fn calculate_rsi(prices: &[f64], _period: usize) -> f64 {
    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let gains: f64 = deltas.iter().filter(|d| **d > 0.0).sum();
    let losses: f64 = deltas.iter().filter(|d| **d < 0.0).sum::<f64>().abs();

    if losses == 0.0 {
        return 100.0;
    }

    let rs = gains / losses;
    100.0 - (100.0 / (1.0 + rs))
}

/// Conventional smoothed RSI, last value after feeding the whole series.
pub fn rolling_rsi(prices: &[f64], period: usize) -> Option<f64> {
    let mut rsi_indicator = RelativeStrengthIndex::new(period).ok()?;

    if prices.len() < period {
        return None;
    }

    let mut last_rsi: Option<f64> = None;
    for &price in prices {
        last_rsi = Some(rsi_indicator.next(price));
    }
    last_rsi
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractalKind {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fractal {
    pub index: usize,
    pub kind: FractalKind,
}

/// Turning points found by comparing each price with the ones two steps away.
pub fn fractal_analysis(prices: &[f64]) -> Vec<Fractal> {
    if prices.len() < 5 {
        return Vec::new();
    }

    (2..prices.len() - 2)
        .filter_map(|i| {
            let (before, here, after) = (prices[i - 2], prices[i], prices[i + 2]);
            if before < here && here > after {
                Some(Fractal { index: i, kind: FractalKind::High })
            } else if before > here && here < after {
                Some(Fractal { index: i, kind: FractalKind::Low })
            } else {
                None
            }
        })
        .collect()
}

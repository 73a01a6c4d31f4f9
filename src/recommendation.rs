use crate::indicators::FibonacciLevels;
use std::fmt;

pub const OVERSOLD_RSI: f64 = 30.0;
pub const OVERBOUGHT_RSI: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => f.write_str("Buy"),
            Recommendation::Sell => f.write_str("Sell"),
            Recommendation::Hold => f.write_str("Hold"),
        }
    }
}

/// Buy when oversold below the 38.2% level, sell when overbought above the
/// 61.8% level, hold otherwise.
pub fn make_recommendation(rsi: f64, current_price: f64, fib: &FibonacciLevels) -> Recommendation {
    if rsi < OVERSOLD_RSI && current_price < fib.level_382 {
        Recommendation::Buy
    } else if rsi > OVERBOUGHT_RSI && current_price > fib.level_618 {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

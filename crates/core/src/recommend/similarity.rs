use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Cosine similarity between two equal-length vectors; `0.0` when either
/// vector has zero norm (an empty or unparseable name).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Price span across the products compared in one request (reference plus
/// every candidate, not just candidates).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Spans the given prices. `None` when the iterator is empty.
    pub fn spanning(prices: impl IntoIterator<Item = Decimal>) -> Option<Self> {
        let mut prices = prices.into_iter();
        let first = prices.next()?;
        let mut range = Self { min: first, max: first };
        for price in prices {
            range.min = range.min.min(price);
            range.max = range.max.max(price);
        }
        Some(range)
    }

    /// Maps `price` into `[0,1]` relative to the span. A degenerate span
    /// (min == max) maps every price to `0.0`.
    pub fn normalize(&self, price: Decimal) -> f64 {
        if self.min == self.max {
            return 0.0;
        }
        ((price - self.min) / (self.max - self.min)).to_f64().unwrap_or(0.0)
    }
}

/// Proximity of two already-normalized prices.
pub fn price_similarity(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs()
}

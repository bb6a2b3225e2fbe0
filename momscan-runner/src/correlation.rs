//! Correlation screen over several close series.
//!
//! Series are aligned on the union of their dates; each pair is correlated
//! over the dates where both have a close (pairwise-complete Pearson). A pair
//! with fewer than two shared sessions, or with a flat side, has no defined
//! correlation and is stored as NaN.
//!
//! `correlated_with` excludes the target by position, not by value: a peer
//! whose closes are an exact affine copy of the target (correlation 1.0, e.g.
//! a dual listing) is still reported. Whether such a pair computes to exactly
//! 1.0 or to 1.0 minus rounding depends on the data, so filtering on the value
//! would drop some copies and keep others.

use serde::{Deserialize, Serialize};

use momscan_core::data::align_closes;
use momscan_core::domain::PriceSeries;

/// Default cut-off for "highly correlated".
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub identifiers: Vec<String>,
    /// Row-major, `identifiers.len()²` entries.
    values: Vec<f64>,
}

/// One entry of a `correlated_with` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPeer {
    pub identifier: String,
    pub correlation: f64,
}

impl CorrelationMatrix {
    pub fn from_series(series: &[PriceSeries]) -> Self {
        let aligned = align_closes(series);
        let n = aligned.identifiers.len();
        let mut values = vec![f64::NAN; n * n];

        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let r = pearson(&aligned.closes[i], &aligned.closes[j]);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        Self {
            identifiers: aligned.identifiers,
            values,
        }
    }

    fn index_of(&self, identifier: &str) -> Option<usize> {
        self.identifiers.iter().position(|id| id == identifier)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[i * self.identifiers.len() + j])
    }

    /// Other identifiers whose correlation with `target` is strictly above
    /// `threshold`, highest first. `None` if `target` is not in the matrix.
    pub fn correlated_with(&self, target: &str, threshold: f64) -> Option<Vec<CorrelatedPeer>> {
        let i = self.index_of(target)?;
        let n = self.identifiers.len();
        let mut peers: Vec<CorrelatedPeer> = (0..n)
            .filter(|&j| j != i)
            .filter_map(|j| {
                let r = self.values[i * n + j];
                (r > threshold).then(|| CorrelatedPeer {
                    identifier: self.identifiers[j].clone(),
                    correlation: r,
                })
            })
            .collect();
        peers.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
        Some(peers)
    }
}

/// Pearson correlation over indices where both values are present.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

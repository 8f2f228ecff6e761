//! Averaging pair scores and filtering them against a threshold

use crate::core::scorer::ScoreBuckets;
use crate::core::tool::ToolPair;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_THRESHOLD_PERCENT: u8 = 50;

/// Arithmetic mean, `None` for an empty slice.
///
/// The sum is carried as a compensated (Neumaier) high/low pair and divided
/// with an FMA correction term, so the result is the correctly rounded mean
/// rather than one drifting in the last printed digits.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let (hi, lo) = compensated_sum(values);
    let n = values.len() as f64;
    let q = hi / n;
    // exact remainder of hi / n
    let r = (-q).mul_add(n, hi);
    Some(q + (r + lo) / n)
}

/// Neumaier summation, returned as a normalized `(high, low)` pair
fn compensated_sum(values: &[f64]) -> (f64, f64) {
    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    let hi = sum + compensation;
    let lo = compensation - (hi - sum);
    (hi, lo)
}

/// Convert an integer percentage to the fraction scores are compared with
pub fn percent_to_fraction(percent: u8) -> f64 {
    f64::from(percent) / 100.0
}

/// Average similarity per tool pair. Pairs with no comparisons are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairMeans {
    means: IndexMap<ToolPair, f64>,
}

impl PairMeans {
    pub fn from_buckets(buckets: &ScoreBuckets) -> Self {
        let mut means = IndexMap::new();
        for (pair, scores) in buckets.iter() {
            match mean(scores) {
                Some(avg) => {
                    debug!("{}: mean {} over {} comparisons", pair, avg, scores.len());
                    means.insert(pair, avg);
                }
                None => debug!("{}: no comparisons, left out", pair),
            }
        }
        info!("Averaged scores for {} tool pairs", means.len());
        Self { means }
    }

    pub fn get(&self, pair: ToolPair) -> Option<f64> {
        self.means.get(&pair).copied()
    }

    /// Present pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ToolPair, f64)> + '_ {
        ToolPair::all()
            .into_iter()
            .filter_map(move |pair| self.get(pair).map(|m| (pair, m)))
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Pairs whose mean is at least `threshold_percent / 100`
    pub fn apply_threshold(&self, threshold_percent: u8) -> ThresholdResult {
        let cutoff = percent_to_fraction(threshold_percent);
        let passing: Vec<(ToolPair, f64)> = self.iter().filter(|(_, m)| *m >= cutoff).collect();
        info!(
            "{} of {} tool pairs meet the {}% threshold",
            passing.len(),
            self.len(),
            threshold_percent
        );
        ThresholdResult {
            threshold_percent,
            means: self.clone(),
            passing,
        }
    }
}

/// Outcome of the threshold filter, ready for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
    pub threshold_percent: u8,
    pub means: PairMeans,
    pub passing: Vec<(ToolPair, f64)>,
}

impl ThresholdResult {
    pub fn is_empty(&self) -> bool {
        self.passing.is_empty()
    }
}

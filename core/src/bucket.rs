//! Percentile thresholds over the loaded data set, and the small fixed
//! bucket sets they feed. Purely for visual sizing and coloring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
    Huge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianBand {
    AtOrAbove,
    Below,
}

/// Sort ascending, dropping NaN.
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Quantile `p` in [0, 1] of already-sorted values, interpolating linearly
/// between the two nearest order statistics (position `(n - 1) * p`).
fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
        }
    }
}

pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), p)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

impl Quartiles {
    /// `None` for an empty input.
    pub fn of(values: &[f64]) -> Option<Self> {
        let v = sorted(values);
        Some(Self {
            q1: quantile_sorted(&v, 0.25)?,
            q2: quantile_sorted(&v, 0.50)?,
            q3: quantile_sorted(&v, 0.75)?,
        })
    }

    /// Lower bounds are inclusive: a value equal to Q3 is `Huge`.
    pub fn bucket(&self, value: f64) -> SizeBucket {
        if value >= self.q3 {
            SizeBucket::Huge
        } else if value >= self.q2 {
            SizeBucket::Large
        } else if value >= self.q1 {
            SizeBucket::Medium
        } else {
            SizeBucket::Small
        }
    }
}

pub fn median_band(value: f64, median: f64) -> MedianBand {
    if value >= median {
        MedianBand::AtOrAbove
    } else {
        MedianBand::Below
    }
}

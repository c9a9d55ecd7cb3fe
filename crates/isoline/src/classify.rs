//! Classification rules mapping a value sample to a break sequence.
//!
//! This is the `num2breaks`-style collaborator of the pipeline: given the
//! non-missing surface values, a requested class count and a style, produce
//! a strictly increasing break sequence bracketing the effective data
//! range.

use map_common::{SmoothError, SmoothResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classification style for break selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyStyle {
    /// Equal-width intervals over the data range.
    #[default]
    Equal,
    /// Quantiles of the data distribution.
    Quantile,
    /// "Pretty" rounded breaks on a 1-2-5 step ladder.
    Pretty,
    /// 1-D k-means cluster boundaries.
    Kmeans,
    /// Explicitly supplied breaks, used verbatim.
    Fixed,
}

impl FromStr for ClassifyStyle {
    type Err = SmoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equal" => Ok(ClassifyStyle::Equal),
            "quantile" => Ok(ClassifyStyle::Quantile),
            "pretty" => Ok(ClassifyStyle::Pretty),
            "kmeans" => Ok(ClassifyStyle::Kmeans),
            "fixed" => Ok(ClassifyStyle::Fixed),
            other => Err(SmoothError::InvalidParameter {
                param: "style".to_string(),
                message: format!("unknown classification style '{}'", other),
            }),
        }
    }
}

/// Compute class breaks for `values` (must be non-missing).
///
/// `fixed` must be `Some` when `style == Fixed` and is used verbatim after
/// a monotonicity check. All other styles derive `n` classes (so `n + 1`
/// breaks where the style permits) from the data.
pub fn class_breaks(
    values: &[f64],
    n: usize,
    style: ClassifyStyle,
    fixed: Option<&[f64]>,
) -> SmoothResult<Vec<f64>> {
    if let ClassifyStyle::Fixed = style {
        let breaks = fixed.ok_or_else(|| {
            SmoothError::InvalidBreaks("style 'fixed' requires explicit breaks".to_string())
        })?;
        validate_breaks(breaks)?;
        return Ok(breaks.to_vec());
    }

    if values.is_empty() {
        return Err(SmoothError::InvalidBreaks(
            "no non-missing values to classify".to_string(),
        ));
    }
    let n = n.max(1);
    let (min, max) = value_range(values);
    if min == max {
        return Err(SmoothError::InvalidBreaks(format!(
            "constant surface (all values {}), cannot derive breaks",
            min
        )));
    }

    let breaks = match style {
        ClassifyStyle::Equal => equal_breaks(min, max, n),
        ClassifyStyle::Quantile => quantile_breaks(values, n),
        ClassifyStyle::Pretty => pretty_breaks(min, max, n),
        ClassifyStyle::Kmeans => kmeans_breaks(values, n),
        ClassifyStyle::Fixed => unreachable!("handled above"),
    };

    let breaks = dedupe(breaks);
    validate_breaks(&breaks)?;
    Ok(breaks)
}

/// Reject break sequences with fewer than 2 entries or any non-increasing
/// step.
pub fn validate_breaks(breaks: &[f64]) -> SmoothResult<()> {
    if breaks.len() < 2 {
        return Err(SmoothError::InvalidBreaks(format!(
            "need at least 2 breaks, got {}",
            breaks.len()
        )));
    }
    for w in breaks.windows(2) {
        if w[1] <= w[0] {
            return Err(SmoothError::InvalidBreaks(format!(
                "breaks must be strictly increasing, found {} then {}",
                w[0], w[1]
            )));
        }
    }
    Ok(())
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn equal_breaks(min: f64, max: f64, n: usize) -> Vec<f64> {
    let step = (max - min) / n as f64;
    (0..=n).map(|i| min + i as f64 * step).collect()
}

fn quantile_breaks(values: &[f64], n: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    (0..=n)
        .map(|i| {
            let q = i as f64 / n as f64;
            let pos = q * (sorted.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] * (1.0 - frac) + sorted[hi] * frac
        })
        .collect()
}

/// Rounded breaks covering `[min, max]` with a step from the 1-2-5 ladder,
/// aiming for roughly `n` intervals.
fn pretty_breaks(min: f64, max: f64, n: usize) -> Vec<f64> {
    let raw_step = (max - min) / n as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = nice * magnitude;

    let start = (min / step).floor() * step;
    let mut breaks = Vec::new();
    let mut level = start;
    // Keep stepping until the last pushed break is at or above max, so the
    // ladder always brackets the data range.
    while level < max + step {
        breaks.push(level);
        level += step;
    }
    breaks
}

/// 1-D k-means (Lloyd's algorithm) on the sorted sample; breaks are the
/// data range endpoints plus midpoints between adjacent cluster centers.
fn kmeans_breaks(values: &[f64], n: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let k = n.min(sorted.len());

    // Initialize centers at evenly spaced sample quantiles.
    let mut centers: Vec<f64> = (0..k)
        .map(|i| sorted[(i * (sorted.len() - 1)) / k.max(1)])
        .collect();

    for _ in 0..50 {
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for &v in &sorted {
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for (c, &center) in centers.iter().enumerate() {
                let d = (v - center).abs();
                if d < best_d {
                    best_d = d;
                    best = c;
                }
            }
            sums[best] += v;
            counts[best] += 1;
        }
        let mut moved = false;
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            let next = sums[c] / counts[c] as f64;
            if (next - centers[c]).abs() > 1e-12 {
                moved = true;
            }
            centers[c] = next;
        }
        if !moved {
            break;
        }
    }
    centers.sort_by(f64::total_cmp);

    let mut breaks = Vec::with_capacity(k + 1);
    breaks.push(sorted[0]);
    for w in centers.windows(2) {
        breaks.push((w[0] + w[1]) / 2.0);
    }
    breaks.push(*sorted.last().expect("non-empty sample"));
    breaks
}

/// Drop repeated breaks; quantiles of heavily tied samples produce them.
fn dedupe(breaks: Vec<f64>) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(breaks.len());
    for b in breaks {
        if out.last().map_or(true, |&last| b > last) {
            out.push(b);
        }
    }
    out
}

//! Test data generators for creating synthetic spatial data.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite. Random generators take an explicit seed so
//! two runs of the same test see byte-identical input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random points in the unit square.
///
/// # Arguments
///
/// * `n` - Number of points
/// * `seed` - RNG seed; the same seed always yields the same points
pub fn random_unit_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect()
}

/// Random points clustered around a center with the given spread.
///
/// Offsets are uniform in `[-spread, spread]` per axis; this is not a
/// Gaussian cluster but is compact enough to produce a single density
/// mode, which is what the cover tests need.
pub fn clustered_points(
    n: usize,
    center: (f64, f64),
    spread: f64,
    seed: u64,
) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            (
                center.0 + rng.gen_range(-spread..spread),
                center.1 + rng.gen_range(-spread..spread),
            )
        })
        .collect()
}

/// Two compact clusters, for bimodal-density scenarios.
pub fn bimodal_points(n_per_cluster: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut pts = clustered_points(n_per_cluster, (0.25, 0.25), 0.08, seed);
    pts.extend(clustered_points(n_per_cluster, (0.75, 0.75), 0.08, seed ^ 0xbeef));
    pts
}

/// Creates a grid with a linear gradient from `lo` (south-west corner) to
/// `hi` (north-east corner), in row-major order with row 0 southernmost.
pub fn gradient_values(ncols: usize, nrows: usize, lo: f64, hi: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(ncols * nrows);
    for row in 0..nrows {
        for col in 0..ncols {
            let x_factor = col as f64 / (ncols.max(2) - 1) as f64;
            let y_factor = row as f64 / (nrows.max(2) - 1) as f64;
            data.push(lo + (hi - lo) * (x_factor + y_factor) / 2.0);
        }
    }
    data
}

/// Creates a grid with a single radial peak in the center: `peak` at the
/// center falling off to zero at the corners.
pub fn peak_values(ncols: usize, nrows: usize, peak: f64) -> Vec<f64> {
    let cx = (ncols as f64 - 1.0) / 2.0;
    let cy = (nrows as f64 - 1.0) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();
    let mut data = Vec::with_capacity(ncols * nrows);
    for row in 0..nrows {
        for col in 0..ncols {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            data.push(peak * (1.0 - dist / max_dist).max(0.0));
        }
    }
    data
}

/// Creates a grid with two radial peaks, one in each diagonal quadrant.
pub fn twin_peak_values(ncols: usize, nrows: usize, peak: f64) -> Vec<f64> {
    let centers = [
        (ncols as f64 * 0.25, nrows as f64 * 0.25),
        (ncols as f64 * 0.75, nrows as f64 * 0.75),
    ];
    let radius = (ncols.min(nrows) as f64) * 0.2;
    let mut data = Vec::with_capacity(ncols * nrows);
    for row in 0..nrows {
        for col in 0..ncols {
            let mut v: f64 = 0.0;
            for &(cx, cy) in &centers {
                let dx = col as f64 - cx;
                let dy = row as f64 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                v = v.max(peak * (1.0 - dist / radius).max(0.0));
            }
            data.push(v);
        }
    }
    data
}

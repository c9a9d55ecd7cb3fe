//! Separable Gaussian kernel smoothing over a raster grid.

use map_common::Surface;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Smoothing kernel width per axis, in coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bandwidth {
    pub x: f64,
    pub y: f64,
}

impl Bandwidth {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The spec default: 3 cells per axis.
    pub fn default_for(grid: &map_common::GridSpec) -> Self {
        Self {
            x: 3.0 * grid.cell_width(),
            y: 3.0 * grid.cell_height(),
        }
    }
}

/// Smooth a surface with a separable Gaussian kernel.
///
/// The bandwidth is the Gaussian sigma per axis. Missing cells contribute
/// no mass and the tap weights renormalize over the valid neighborhood
/// (normalized convolution), so values extrapolate smoothly a short way
/// into missing areas instead of bleeding `NaN`. Cells whose entire
/// neighborhood is missing stay missing.
///
/// The result is unnormalized; callers rescale to the wanted total mass.
pub fn gaussian_smooth(surface: &Surface, bandwidth: Bandwidth) -> Surface {
    let grid = surface.grid;
    let sigma_x = bandwidth.x / grid.cell_width();
    let sigma_y = bandwidth.y / grid.cell_height();
    let taps_x = gaussian_taps(sigma_x);
    let taps_y = gaussian_taps(sigma_y);

    // Track values and validity weights through both passes.
    let masses: Vec<f64> = surface
        .values
        .iter()
        .map(|&v| if v.is_nan() { 0.0 } else { v })
        .collect();
    let weights: Vec<f64> = surface
        .values
        .iter()
        .map(|&v| if v.is_nan() { 0.0 } else { 1.0 })
        .collect();

    let masses = convolve_rows(&masses, grid.ncols, &taps_x);
    let weights = convolve_rows(&weights, grid.ncols, &taps_x);
    let masses = convolve_cols(&masses, grid.nrows, grid.ncols, &taps_y);
    let weights = convolve_cols(&weights, grid.nrows, grid.ncols, &taps_y);

    let values = masses
        .iter()
        .zip(&weights)
        .map(|(&m, &w)| if w < 1e-10 { f64::NAN } else { m / w })
        .collect();

    Surface::new(grid, values)
}

/// Normalized Gaussian taps with half-width 3 sigma.
fn gaussian_taps(sigma: f64) -> Vec<f64> {
    let half = (sigma * 3.0).ceil().max(1.0) as i64;
    let mut taps: Vec<f64> = (-half..=half)
        .map(|i| {
            let t = i as f64 / sigma.max(1e-12);
            (-0.5 * t * t).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

fn convolve_rows(values: &[f64], ncols: usize, taps: &[f64]) -> Vec<f64> {
    let half = (taps.len() / 2) as i64;
    let mut out = vec![0.0; values.len()];
    out.par_chunks_mut(ncols)
        .zip(values.par_chunks(ncols))
        .for_each(|(out_row, in_row)| {
            for col in 0..ncols {
                let mut acc = 0.0;
                for (k, &tap) in taps.iter().enumerate() {
                    let src = col as i64 + k as i64 - half;
                    if src >= 0 && src < ncols as i64 {
                        acc += tap * in_row[src as usize];
                    }
                }
                out_row[col] = acc;
            }
        });
    out
}

fn convolve_cols(values: &[f64], nrows: usize, ncols: usize, taps: &[f64]) -> Vec<f64> {
    let half = (taps.len() / 2) as i64;
    let mut out = vec![0.0; values.len()];
    out.par_chunks_mut(ncols)
        .enumerate()
        .for_each(|(row, out_row)| {
            for col in 0..ncols {
                let mut acc = 0.0;
                for (k, &tap) in taps.iter().enumerate() {
                    let src = row as i64 + k as i64 - half;
                    if src >= 0 && src < nrows as i64 {
                        acc += tap * values[src as usize * ncols + col];
                    }
                }
                out_row[col] = acc;
            }
        });
    out
}

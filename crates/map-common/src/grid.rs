//! Regular raster grids and scalar surfaces.

use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// Specification of a regular raster grid.
///
/// The grid is defined by its bounding box and cell counts; cell sizes are
/// derived. Row 0 is the southernmost row, column 0 the westernmost column,
/// and values are addressed in row-major order. A `GridSpec` is immutable
/// once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub bbox: BoundingBox,
    pub nrows: usize,
    pub ncols: usize,
}

impl GridSpec {
    /// Create a new grid specification.
    pub fn new(bbox: BoundingBox, nrows: usize, ncols: usize) -> Self {
        Self { bbox, nrows, ncols }
    }

    /// Derive grid dimensions from a target total cell count and the bbox
    /// aspect ratio, so cells come out roughly square.
    pub fn with_target_cells(bbox: BoundingBox, target_cells: usize) -> Self {
        let aspect = bbox.aspect_ratio().max(1e-9);
        let nrows = ((target_cells as f64 / aspect).sqrt().round() as usize).max(2);
        let ncols = ((target_cells as f64 * aspect).sqrt().round() as usize).max(2);
        Self { bbox, nrows, ncols }
    }

    /// Cell width in coordinate units.
    pub fn cell_width(&self) -> f64 {
        self.bbox.width() / self.ncols as f64
    }

    /// Cell height in coordinate units.
    pub fn cell_height(&self) -> f64 {
        self.bbox.height() / self.nrows as f64
    }

    /// Area of one cell.
    pub fn cell_area(&self) -> f64 {
        self.cell_width() * self.cell_height()
    }

    /// X coordinates of cell centers, west to east.
    pub fn x_centers(&self) -> Vec<f64> {
        let dx = self.cell_width();
        (0..self.ncols)
            .map(|c| self.bbox.min_x + (c as f64 + 0.5) * dx)
            .collect()
    }

    /// Y coordinates of cell centers, south to north.
    pub fn y_centers(&self) -> Vec<f64> {
        let dy = self.cell_height();
        (0..self.nrows)
            .map(|r| self.bbox.min_y + (r as f64 + 0.5) * dy)
            .collect()
    }

    /// Coordinates of the center of cell `(row, col)`.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.bbox.min_x + (col as f64 + 0.5) * self.cell_width(),
            self.bbox.min_y + (row as f64 + 0.5) * self.cell_height(),
        )
    }

    /// Cell index containing a coordinate, or `None` when outside the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.bbox.contains_point(x, y) {
            return None;
        }
        let col = (((x - self.bbox.min_x) / self.cell_width()) as usize).min(self.ncols - 1);
        let row = (((y - self.bbox.min_y) / self.cell_height()) as usize).min(self.nrows - 1);
        Some((row, col))
    }

    /// The 1-D array index for a 2-D grid position.
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.ncols + col
    }

    /// Total number of grid cells.
    pub fn len(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }
}

/// A scalar surface: a grid plus one value per cell.
///
/// `NaN` encodes a missing or masked cell. Operations that change values
/// (masking, smoothing, normalization) return a new `Surface` rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub grid: GridSpec,
    pub values: Vec<f64>,
}

impl Surface {
    /// Create a surface from a grid and row-major values.
    ///
    /// Panics if the value count does not match the grid size; the grid and
    /// its values are always constructed together in this workspace.
    pub fn new(grid: GridSpec, values: Vec<f64>) -> Self {
        assert_eq!(grid.len(), values.len(), "value count must match grid size");
        Self { grid, values }
    }

    /// A surface of all-zero values.
    pub fn zeros(grid: GridSpec) -> Self {
        let values = vec![0.0; grid.len()];
        Self { grid, values }
    }

    /// Value at `(row, col)`.
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.values[self.grid.flat_index(row, col)]
    }

    /// Sum of non-missing values.
    pub fn total(&self) -> f64 {
        self.values.iter().filter(|v| !v.is_nan()).sum()
    }

    /// Integral of the surface: sum of non-missing values times cell area.
    pub fn integral(&self) -> f64 {
        self.total() * self.grid.cell_area()
    }

    /// Minimum and maximum over non-missing values, or `None` if every cell
    /// is missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &v in &self.values {
            if v.is_nan() {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range
    }

    /// Non-missing values, in row-major order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }

    /// Return a new surface with cells outside `mask` set to missing.
    pub fn masked(&self, mask: &[bool]) -> Surface {
        assert_eq!(mask.len(), self.values.len(), "mask must match grid size");
        let values = self
            .values
            .iter()
            .zip(mask)
            .map(|(&v, &keep)| if keep { v } else { f64::NAN })
            .collect();
        Surface {
            grid: self.grid,
            values,
        }
    }

    /// Return a new surface scaled so that its integral equals `mass`.
    ///
    /// A surface with zero integral is returned unchanged; there is nothing
    /// meaningful to normalize.
    pub fn normalized_to(&self, mass: f64) -> Surface {
        let integral = self.integral();
        if integral == 0.0 {
            return self.clone();
        }
        let scale = mass / integral;
        let values = self
            .values
            .iter()
            .map(|&v| if v.is_nan() { v } else { v * scale })
            .collect();
        Surface {
            grid: self.grid,
            values,
        }
    }
}

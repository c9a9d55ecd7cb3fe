//! Input geometry for the smoothing pipeline.
//!
//! The pipeline accepts three shapes of spatial input, modeled as a closed
//! enum so every consumer dispatches with a match instead of runtime type
//! checks. Each variant supports the same small capability set: bounding
//! box, rasterization onto a target grid, and representative points.

use crate::{BoundingBox, GridSpec, Surface};
use geo::{Contains, Polygon};

/// A set of 2D points with optional per-point weights.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    pub coords: Vec<(f64, f64)>,
    /// Per-point weights; `None` means every point counts as 1.
    pub weights: Option<Vec<f64>>,
}

impl PointSet {
    pub fn new(coords: Vec<(f64, f64)>) -> Self {
        Self {
            coords,
            weights: None,
        }
    }

    pub fn with_weights(coords: Vec<(f64, f64)>, weights: Vec<f64>) -> Self {
        Self {
            coords,
            weights: Some(weights),
        }
    }

    /// Total mass of the point set before any uniform weight multiplier.
    pub fn total_weight(&self) -> f64 {
        match &self.weights {
            Some(w) => w.iter().sum(),
            None => self.coords.len() as f64,
        }
    }
}

/// A set of polygons, each carrying one value of the mapped variable.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSet {
    pub polygons: Vec<Polygon<f64>>,
    /// One value per polygon; `NaN` marks a missing observation.
    pub values: Vec<f64>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon<f64>>, values: Vec<f64>) -> Self {
        Self { polygons, values }
    }

    /// Sum of non-missing polygon values.
    pub fn total_value(&self) -> f64 {
        self.values.iter().filter(|v| !v.is_nan()).sum()
    }
}

/// Gridded input: an existing surface of cell values.
#[derive(Debug, Clone, PartialEq)]
pub struct GridData {
    pub surface: Surface,
}

/// Spatial input to the pipeline, as a closed tagged variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Points(PointSet),
    Polygons(PolygonSet),
    Grid(GridData),
}

impl Geometry {
    /// Bounding box of the input data.
    ///
    /// Returns `None` for empty input (no points, no polygons).
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Geometry::Points(p) => BoundingBox::of_points(&p.coords),
            Geometry::Polygons(p) => {
                let mut bbox: Option<BoundingBox> = None;
                for poly in &p.polygons {
                    let coords: Vec<(f64, f64)> =
                        poly.exterior().coords().map(|c| (c.x, c.y)).collect();
                    if let Some(b) = BoundingBox::of_points(&coords) {
                        bbox = Some(match bbox {
                            Some(acc) => acc.union(&b),
                            None => b,
                        });
                    }
                }
                bbox
            }
            Geometry::Grid(g) => Some(g.surface.grid.bbox),
        }
    }

    /// Rasterize the input onto `grid`.
    ///
    /// Points are binned into cells by weight. Polygon values are
    /// apportioned evenly over the cells whose centers the polygon
    /// contains, so the raster total matches the polygon total. Existing
    /// grids are resampled by nearest cell center; cells outside the
    /// source grid come out missing.
    pub fn to_raster(&self, grid: &GridSpec) -> Surface {
        match self {
            Geometry::Points(p) => {
                let mut values = vec![0.0; grid.len()];
                for (i, &(x, y)) in p.coords.iter().enumerate() {
                    let w = p.weights.as_ref().map_or(1.0, |ws| ws[i]);
                    if let Some((row, col)) = grid.cell_at(x, y) {
                        values[grid.flat_index(row, col)] += w;
                    }
                }
                Surface::new(*grid, values)
            }
            Geometry::Polygons(p) => {
                let mut values = vec![f64::NAN; grid.len()];
                for (poly, &value) in p.polygons.iter().zip(&p.values) {
                    if value.is_nan() {
                        continue;
                    }
                    let cells = cells_inside(grid, poly);
                    if cells.is_empty() {
                        continue;
                    }
                    let share = value / cells.len() as f64;
                    for idx in cells {
                        values[idx] = if values[idx].is_nan() {
                            share
                        } else {
                            values[idx] + share
                        };
                    }
                }
                Surface::new(*grid, values)
            }
            Geometry::Grid(g) => {
                let src = &g.surface;
                let mut values = vec![f64::NAN; grid.len()];
                for row in 0..grid.nrows {
                    for col in 0..grid.ncols {
                        let (x, y) = grid.cell_center(row, col);
                        if let Some((sr, sc)) = src.grid.cell_at(x, y) {
                            values[grid.flat_index(row, col)] = src.value_at(sr, sc);
                        }
                    }
                }
                Surface::new(*grid, values)
            }
        }
    }

    /// Representative points of the input: the points themselves, polygon
    /// exterior centroids, or the centers of non-missing grid cells.
    pub fn representative_points(&self) -> Vec<(f64, f64)> {
        use geo::Centroid;
        match self {
            Geometry::Points(p) => p.coords.clone(),
            Geometry::Polygons(p) => p
                .polygons
                .iter()
                .filter_map(|poly| poly.centroid().map(|c| (c.x(), c.y())))
                .collect(),
            Geometry::Grid(g) => {
                let grid = g.surface.grid;
                let mut pts = Vec::new();
                for row in 0..grid.nrows {
                    for col in 0..grid.ncols {
                        if !g.surface.value_at(row, col).is_nan() {
                            pts.push(grid.cell_center(row, col));
                        }
                    }
                }
                pts
            }
        }
    }
}

/// Flat indices of grid cells whose centers lie inside the polygon.
fn cells_inside(grid: &GridSpec, poly: &Polygon<f64>) -> Vec<usize> {
    let mut out = Vec::new();
    for row in 0..grid.nrows {
        for col in 0..grid.ncols {
            let (x, y) = grid.cell_center(row, col);
            if poly.contains(&geo::Point::new(x, y)) {
                out.push(grid.flat_index(row, col));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_point_binning_preserves_mass() {
        let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 8, 8);
        let geom = Geometry::Points(PointSet::new(vec![(0.1, 0.1), (0.9, 0.9), (0.5, 0.5)]));
        let raster = geom.to_raster(&grid);
        assert!((raster.total() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_representative_points_are_centroids_for_polygons() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let geom = Geometry::Polygons(PolygonSet::new(vec![poly], vec![1.0]));
        let pts = geom.representative_points();
        assert_eq!(pts.len(), 1);
        assert!((pts[0].0 - 1.0).abs() < 1e-12);
        assert!((pts[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_apportionment_preserves_total() {
        let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 10, 10);
        let poly = polygon![
            (x: 0.05, y: 0.05),
            (x: 0.95, y: 0.05),
            (x: 0.95, y: 0.95),
            (x: 0.05, y: 0.95),
        ];
        let geom = Geometry::Polygons(PolygonSet::new(vec![poly], vec![42.0]));
        let raster = geom.to_raster(&grid);
        assert!((raster.total() - 42.0).abs() < 1e-9);
    }
}

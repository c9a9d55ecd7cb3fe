//! Command-line front end for the smoothing pipeline.
//!
//! Reads a point table (CSV, `x,y[,weight]` per line, `#` comments),
//! runs the pipeline and writes the requested artifacts as GeoJSON next
//! to the output prefix, plus a `scene.json` with the composed layout.
//!
//! Usage:
//!   smoothmap --input points.csv --output ./out/map \
//!       --levels 5 --style pretty --cover-strategy smooth

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use layout::{compose, LayoutOptions, LegendItem, MetaElements};
use smooth_map::{
    contours_to_geojson, regions_to_geojson, smooth_surface, ClassifyStyle, CoverStrategy,
    Geometry, SmoothError, SmoothOptions,
};

/// Smoothed thematic map generator
#[derive(Parser, Debug)]
#[command(name = "smoothmap")]
#[command(about = "Estimate a density surface from points and derive isolines and regions")]
struct Args {
    /// Input CSV file with one "x,y" or "x,y,weight" row per point
    #[arg(short, long)]
    input: PathBuf,

    /// Output path prefix; artifacts are written as <prefix>.<name>.json
    #[arg(short, long)]
    output: PathBuf,

    /// Number of classes when breaks are derived from the data
    #[arg(long, default_value_t = 5)]
    levels: usize,

    /// Classification style: equal, quantile, pretty or kmeans
    #[arg(long, default_value = "pretty")]
    style: String,

    /// Explicit breaks, comma separated; overrides --style
    #[arg(long)]
    breaks: Option<String>,

    /// Kernel bandwidth as "bx,by" in coordinate units
    #[arg(long)]
    bandwidth: Option<String>,

    /// Cover strategy: rect, original or smooth
    #[arg(long)]
    cover_strategy: Option<String>,

    /// GeoJSON file whose Polygon/MultiPolygon geometry is the cover
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Fraction of the surface maximum for the smooth cover strategy
    #[arg(long, default_value_t = 0.6)]
    cover_threshold: f64,

    /// Artifacts to produce (repeatable): raster, contours, regions
    #[arg(long = "artifact")]
    artifacts: Vec<String>,

    /// Chaikin smoothing passes applied to contour lines
    #[arg(long, default_value_t = 0)]
    contour_smoothing: u32,

    /// Map title placed in the composed scene
    #[arg(long)]
    title: Option<String>,

    /// Device aspect ratio (width / height) for the scene layout
    #[arg(long, default_value_t = 4.0 / 3.0)]
    device_aspect: f64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .init();

    let geometry = read_points(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let opts = SmoothOptions {
        level_count: args.levels,
        style: Some(args.style.parse::<ClassifyStyle>()?),
        breaks: args.breaks.as_deref().map(parse_numbers).transpose()?,
        bandwidth: parse_bandwidth(args.bandwidth.as_deref())?,
        cover_strategy: args
            .cover_strategy
            .as_deref()
            .map(str::parse::<CoverStrategy>)
            .transpose()?,
        cover: args.cover.as_deref().map(read_cover).transpose()?,
        cover_threshold: args.cover_threshold,
        contour_smoothing: args.contour_smoothing,
        outputs: args.artifacts.clone(),
        ..Default::default()
    };

    let output = smooth_surface(&geometry, &opts)?;

    if let Some(raster) = &output.raster {
        let path = artifact_path(&args.output, "raster");
        fs::write(&path, serde_json::to_string(raster)?)?;
        info!(path = %path.display(), cells = raster.values.len(), "wrote raster");
    }
    if let Some(contours) = &output.contours {
        let path = artifact_path(&args.output, "contours");
        fs::write(&path, serde_json::to_string(&contours_to_geojson(contours))?)?;
        info!(path = %path.display(), n = contours.len(), "wrote contours");
    }
    if let Some(regions) = &output.regions {
        let path = artifact_path(&args.output, "regions");
        fs::write(&path, serde_json::to_string(&regions_to_geojson(regions))?)?;
        info!(path = %path.display(), n = regions.len(), "wrote regions");
    }

    // Compose the page layout around the artifacts. Legend entries come
    // from the region bands when present, from the break set otherwise.
    let legend_items: Vec<LegendItem> = match &output.regions {
        Some(regions) => regions
            .iter()
            .map(|r| LegendItem {
                label: r.band.label.clone(),
                value: r.value,
            })
            .collect(),
        None => Vec::new(),
    };
    let meta = MetaElements {
        title: args.title.clone(),
        ..Default::default()
    };
    let layout_opts = LayoutOptions {
        device_aspect: args.device_aspect,
        ..Default::default()
    };
    let shape_aspect = geometry.bounding_box().map(|b| b.aspect_ratio());
    let scene = compose(legend_items, &meta, shape_aspect, &layout_opts);
    let scene_path = artifact_path(&args.output, "scene");
    fs::write(&scene_path, serde_json::to_string_pretty(&scene)?)?;
    info!(path = %scene_path.display(), "wrote scene");

    Ok(())
}

fn artifact_path(prefix: &Path, name: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_os_string();
    s.push(format!(".{}.json", name));
    PathBuf::from(s)
}

/// Parse the point table. Rows are "x,y" or "x,y,weight"; blank lines and
/// `#` comments are skipped. Weighted and unweighted rows must not mix.
fn read_points(path: &Path) -> anyhow::Result<Geometry> {
    let text = fs::read_to_string(path)?;
    let mut coords = Vec::new();
    let mut weights = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parse = |s: &str| -> anyhow::Result<f64> {
            s.parse::<f64>()
                .with_context(|| format!("line {}: bad number '{}'", lineno + 1, s))
        };
        match fields.as_slice() {
            [x, y] => coords.push((parse(x)?, parse(y)?)),
            [x, y, w] => {
                coords.push((parse(x)?, parse(y)?));
                weights.push(parse(w)?);
            }
            _ => bail!("line {}: expected 2 or 3 fields, got {}", lineno + 1, fields.len()),
        }
    }
    if !weights.is_empty() && weights.len() != coords.len() {
        bail!("weighted and unweighted rows are mixed");
    }

    let points = if weights.is_empty() {
        map_common::PointSet::new(coords)
    } else {
        map_common::PointSet::with_weights(coords, weights)
    };
    Ok(Geometry::Points(points))
}

/// Read a cover polygon from a GeoJSON file. Only Polygon and MultiPolygon
/// geometries are accepted; anything else is an unsupported shape class.
fn read_cover(path: &Path) -> anyhow::Result<geo::MultiPolygon<f64>> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    // Accept a bare geometry, a Feature or a one-feature FeatureCollection.
    let geom = match value["type"].as_str() {
        Some("Feature") => &value["geometry"],
        Some("FeatureCollection") => &value["features"][0]["geometry"],
        Some(_) => &value,
        None => bail!("{}: not a GeoJSON document", path.display()),
    };

    let polygons: Vec<geo::Polygon<f64>> = match geom["type"].as_str() {
        Some("Polygon") => vec![parse_polygon(&geom["coordinates"])?],
        Some("MultiPolygon") => {
            let parts = geom["coordinates"]
                .as_array()
                .context("MultiPolygon coordinates must be an array")?;
            parts.iter().map(parse_polygon).collect::<anyhow::Result<_>>()?
        }
        Some(other) => {
            return Err(SmoothError::UnsupportedGeometry(format!(
                "cover must be Polygon or MultiPolygon, got {}",
                other
            ))
            .into());
        }
        None => bail!("{}: geometry has no type", path.display()),
    };
    Ok(geo::MultiPolygon(polygons))
}

fn parse_polygon(rings: &serde_json::Value) -> anyhow::Result<geo::Polygon<f64>> {
    let rings = rings.as_array().context("polygon must be an array of rings")?;
    let mut parsed: Vec<geo::LineString<f64>> = Vec::with_capacity(rings.len());
    for ring in rings {
        let coords = ring.as_array().context("ring must be an array")?;
        let mut points = Vec::with_capacity(coords.len());
        for pair in coords {
            let x = pair[0].as_f64().context("coordinate must be a number")?;
            let y = pair[1].as_f64().context("coordinate must be a number")?;
            points.push((x, y));
        }
        parsed.push(geo::LineString::from(points));
    }
    let exterior = parsed
        .first()
        .cloned()
        .context("polygon must have at least one ring")?;
    Ok(geo::Polygon::new(exterior, parsed[1..].to_vec()))
}

fn parse_numbers(s: &str) -> anyhow::Result<Vec<f64>> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .with_context(|| format!("bad number '{}'", p))
        })
        .collect()
}

fn parse_bandwidth(s: Option<&str>) -> anyhow::Result<Option<(f64, f64)>> {
    let Some(s) = s else { return Ok(None) };
    let parts = parse_numbers(s)?;
    match parts.as_slice() {
        [b] => Ok(Some((*b, *b))),
        [bx, by] => Ok(Some((*bx, *by))),
        _ => bail!("bandwidth must be one or two numbers"),
    }
}

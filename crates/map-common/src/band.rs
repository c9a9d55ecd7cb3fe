//! Level bands: the intervals between consecutive breaks.

use serde::{Deserialize, Serialize};

/// One value band, left-closed right-open, with a display label.
///
/// The highest band of a set is closed on both sides so the data maximum
/// falls inside it rather than past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
}

/// An ordered set of bands derived from a strictly increasing break
/// sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    pub breaks: Vec<f64>,
    pub bands: Vec<Band>,
}

impl BandSet {
    /// Build bands from breaks.
    ///
    /// With n ≥ 2 breaks this yields n−1 bands. A single break yields two
    /// bands open toward ±∞; the pipeline always arrives with ≥ 2
    /// validated breaks, so that arm serves direct region-builder callers
    /// bucketing against a lone threshold. Callers validate monotonicity
    /// before getting here (see the level selector).
    pub fn from_breaks(breaks: &[f64]) -> BandSet {
        let bands = if breaks.len() == 1 {
            vec![
                Band {
                    lower: f64::NEG_INFINITY,
                    upper: breaks[0],
                    label: format!("under {}", format_value(breaks[0])),
                },
                Band {
                    lower: breaks[0],
                    upper: f64::INFINITY,
                    label: format!("{} or more", format_value(breaks[0])),
                },
            ]
        } else {
            breaks
                .windows(2)
                .map(|w| Band {
                    lower: w[0],
                    upper: w[1],
                    label: format!("{} to {}", format_value(w[0]), format_value(w[1])),
                })
                .collect()
        };
        BandSet {
            breaks: breaks.to_vec(),
            bands,
        }
    }

    /// Index of the band containing `value`.
    ///
    /// Bands are left-closed right-open; the highest band also contains its
    /// upper bound. Values below the first band clamp to it, values above
    /// the last clamp to that, so a `NaN`-free value always buckets.
    pub fn bucket(&self, value: f64) -> usize {
        let last = self.bands.len() - 1;
        for (i, band) in self.bands.iter().enumerate() {
            if value < band.upper || (i == last && value <= band.upper) {
                return i;
            }
        }
        last
    }

    /// The lowest break value, used as the default for missing aggregates.
    pub fn lowest_break(&self) -> f64 {
        self.breaks[0]
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Compact numeric formatting for band labels: whole numbers without a
/// fraction, everything else with two significant decimals.
pub fn format_value(v: f64) -> String {
    if v.fract().abs() < 1e-9 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

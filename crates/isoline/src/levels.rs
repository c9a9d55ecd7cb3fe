//! Level selection: turning a surface into a break sequence.

use crate::classify::{class_breaks, validate_breaks, ClassifyStyle};
use map_common::{SmoothResult, Surface};

/// Select contour levels for a surface.
///
/// Precedence: when `explicit_breaks` is present the style is forced to
/// fixed and the breaks are used verbatim (validated for monotonicity).
/// Otherwise the classification `style` derives `level_count` classes from
/// the non-missing surface values.
pub fn select_levels(
    surface: &Surface,
    level_count: usize,
    style: ClassifyStyle,
    explicit_breaks: Option<&[f64]>,
) -> SmoothResult<Vec<f64>> {
    if let Some(breaks) = explicit_breaks {
        validate_breaks(breaks)?;
        tracing::debug!(
            n_breaks = breaks.len(),
            "explicit breaks supplied, style forced to fixed"
        );
        return Ok(breaks.to_vec());
    }

    let values = surface.valid_values();
    let breaks = class_breaks(&values, level_count, style, None)?;
    tracing::debug!(
        style = ?style,
        level_count,
        n_breaks = breaks.len(),
        first = breaks.first().copied().unwrap_or(f64::NAN),
        last = breaks.last().copied().unwrap_or(f64::NAN),
        "selected levels"
    );
    Ok(breaks)
}

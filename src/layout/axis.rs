use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Axis, PixelDensity, SECONDS_PER_DAY};
use crate::error::{LeukiError, LeukiResult};

use super::{AnnotationSet, LayoutConfig, SeriesSet};

/// Visible chart domain. X is in epoch seconds, Y in measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Computes axis bounds for one draw pass.
///
/// X spans the dated samples with one day of margin on both sides. Y runs from
/// a negative band sized for the stacked annotation labels up to the largest
/// plotted value. The band depends on the surface's current Y density, so the
/// range must be recomputed on every redraw.
pub fn compute_axis_range(
    series: &SeriesSet,
    annotations: &AnnotationSet,
    config: LayoutConfig,
    density: &dyn PixelDensity,
) -> LeukiResult<AxisRange> {
    let config = config.validate()?;
    let Some((first, last)) = series.date_span else {
        warn!("axis range requested without any valid sample date");
        return Err(LeukiError::NoValidDates);
    };

    let y_max = series.max_value().unwrap_or(0.0);
    let y_min = if annotations.stack_depth == 0 {
        0.0
    } else {
        let band_px = config.reserved_band_px(annotations.stack_depth);
        -band_px / y_pixels_per_unit(density)?
    };

    let range = AxisRange {
        x_min: first - SECONDS_PER_DAY,
        x_max: last + SECONDS_PER_DAY,
        y_min,
        y_max,
    };
    debug!(
        x_min = range.x_min,
        x_max = range.x_max,
        y_min = range.y_min,
        y_max = range.y_max,
        "computed axis range"
    );
    Ok(range)
}

/// Current Y density of the surface, rejected when unusable for division.
pub(crate) fn y_pixels_per_unit(density: &dyn PixelDensity) -> LeukiResult<f64> {
    let ppu = density.pixels_per_data_unit(Axis::Y);
    if !ppu.is_finite() || ppu <= 0.0 {
        return Err(LeukiError::InvalidData(format!(
            "surface reported unusable y pixel density: {ppu}"
        )));
    }
    Ok(ppu)
}

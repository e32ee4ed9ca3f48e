use serde::{Deserialize, Serialize};

use crate::error::{LeukiError, LeukiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> LeukiResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(LeukiError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Pixel extent along `axis`.
    #[must_use]
    pub fn extent(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => f64::from(self.width),
            Axis::Y => f64::from(self.height),
        }
    }
}

/// Pixel density of a drawing surface along each axis.
///
/// Label offsets are specified in pixels, so the layout engine needs the
/// surface's current zoom to size the space reserved below the x-axis.
pub trait PixelDensity {
    fn pixels_per_data_unit(&self, axis: Axis) -> f64;
}

/// Fixed per-axis density, for headless layout and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedDensity {
    pub x: f64,
    pub y: f64,
}

impl FixedDensity {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl PixelDensity for FixedDensity {
    fn pixels_per_data_unit(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Linear mapping between a data domain and a pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> LeukiResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(LeukiError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> LeukiResult<f64> {
        validate_extent(extent_px)?;
        if !value.is_finite() {
            return Err(LeukiError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * extent_px)
    }
}

fn validate_extent(extent_px: f64) -> LeukiResult<()> {
    if !extent_px.is_finite() || extent_px <= 0.0 {
        return Err(LeukiError::InvalidData(
            "pixel extent must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

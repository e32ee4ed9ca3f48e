use serde::{Deserialize, Serialize};

use crate::error::{LeukiError, LeukiResult};

/// RGBA color with channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(self) -> LeukiResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        if channels
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
        {
            Ok(())
        } else {
            Err(LeukiError::InvalidData(format!(
                "color channels must lie in [0, 1]: {channels:?}"
            )))
        }
    }
}

/// What a line depicts, so a backend can style each kind separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    Axis,
    Series,
    Connector,
}

/// One straight segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub role: LineRole,
}

impl LinePrimitive {
    pub fn validate(self) -> LeukiResult<()> {
        require_finite("line endpoint", &[self.x1, self.y1, self.x2, self.y2])?;
        require_positive("stroke width", self.stroke_width)?;
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Annotation label anchored at `(x, y)` in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    pub fn validate(&self) -> LeukiResult<()> {
        if self.text.is_empty() {
            return Err(LeukiError::InvalidData("label text is empty".to_owned()));
        }
        require_finite("label anchor", &[self.x, self.y])?;
        require_positive("font size", self.font_size_px)?;
        self.color.validate()
    }
}

fn require_finite(what: &str, values: &[f64]) -> LeukiResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LeukiError::InvalidData(format!("{what} must be finite")))
    }
}

fn require_positive(what: &str, value: f64) -> LeukiResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LeukiError::InvalidData(format!(
            "{what} must be finite and > 0, got {value}"
        )))
    }
}

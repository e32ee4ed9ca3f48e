use serde::{Deserialize, Serialize};

use crate::error::{LeukiError, LeukiResult};

/// Pixel constants for the annotation band below the x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Distance from the x-axis to the first label row.
    pub label_base_offset_px: f64,
    /// Vertical distance between stacked label rows.
    pub label_step_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_base_offset_px: 20.0,
            label_step_px: 15.0,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn with_label_base_offset_px(mut self, px: f64) -> Self {
        self.label_base_offset_px = px;
        self
    }

    #[must_use]
    pub fn with_label_step_px(mut self, px: f64) -> Self {
        self.label_step_px = px;
        self
    }

    pub fn validate(self) -> LeukiResult<Self> {
        for (value, name) in [
            (self.label_base_offset_px, "label_base_offset_px"),
            (self.label_step_px, "label_step_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LeukiError::InvalidData(format!(
                    "layout config `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }

    /// Pixel offset below the x-axis of the label row `stack_index`.
    #[must_use]
    pub fn label_offset_px(self, stack_index: usize) -> f64 {
        self.label_base_offset_px + stack_index as f64 * self.label_step_px
    }

    /// Pixel height reserved below the x-axis for `stack_depth` label rows.
    #[must_use]
    pub fn reserved_band_px(self, stack_depth: usize) -> f64 {
        if stack_depth == 0 {
            0.0
        } else {
            self.label_offset_px(stack_depth)
        }
    }
}

use crate::core::{Axis, FixedDensity, PixelDensity};
use crate::error::LeukiResult;
use crate::render::{RenderFrame, RenderSurface};

/// Headless surface used by tests and the CLI.
///
/// Reports a fixed pixel density and still validates every frame so invalid
/// geometry surfaces without a real backend.
#[derive(Debug)]
pub struct NullRenderer {
    density: FixedDensity,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::new(FixedDensity::new(1.0, 1.0))
    }
}

impl NullRenderer {
    #[must_use]
    pub fn new(density: FixedDensity) -> Self {
        Self {
            density,
            last_line_count: 0,
            last_text_count: 0,
            frames_rendered: 0,
        }
    }

    /// Changes the reported density, as a zoom on a real surface would.
    pub fn set_density(&mut self, density: FixedDensity) {
        self.density = density;
    }
}

impl PixelDensity for NullRenderer {
    fn pixels_per_data_unit(&self, axis: Axis) -> f64 {
        self.density.pixels_per_data_unit(axis)
    }
}

impl RenderSurface for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> LeukiResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.frames_rendered += 1;
        Ok(())
    }
}

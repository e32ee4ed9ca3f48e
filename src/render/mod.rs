mod frame;
mod null_renderer;
mod primitives;

pub use frame::{RenderFrame, RenderStyle};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, LineRole, TextHAlign, TextPrimitive};

use crate::core::PixelDensity;
use crate::error::LeukiResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `RenderFrame`, and report their
/// current pixel density so the layout engine can size the label band.
pub trait RenderSurface: PixelDensity {
    fn render(&mut self, frame: &RenderFrame) -> LeukiResult<()>;
}

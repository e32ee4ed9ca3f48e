use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Axis, LinearScale, MeasurementKind, Viewport};
use crate::error::LeukiResult;
use crate::layout::ChartLayout;
use crate::render::{Color, LinePrimitive, LineRole, TextHAlign, TextPrimitive};

/// Colors and sizes used when projecting a layout into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub leukocytes: Color,
    pub erythrocytes: Color,
    pub hemoglobin: Color,
    pub thrombocytes: Color,
    pub annotation: Color,
    pub axis: Color,
    pub series_stroke_width: f64,
    pub connector_stroke_width: f64,
    pub font_size_px: f64,
    /// Labels anchored closer than this to a side edge are aligned inwards.
    pub label_edge_margin_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            leukocytes: Color::rgb(0.0, 0.0, 1.0),
            erythrocytes: Color::rgb(1.0, 0.0, 0.0),
            hemoglobin: Color::rgb(0.0, 0.6, 0.0),
            thrombocytes: Color::rgb(0.6, 0.0, 0.6),
            annotation: Color::rgb(0.3, 0.3, 0.3).with_alpha(0.9),
            axis: Color::rgb(0.0, 0.0, 0.0),
            series_stroke_width: 2.0,
            connector_stroke_width: 1.0,
            font_size_px: 11.0,
            label_edge_margin_px: 40.0,
        }
    }
}

impl RenderStyle {
    #[must_use]
    pub fn series_color(&self, kind: MeasurementKind) -> Color {
        match kind {
            MeasurementKind::Leukocytes => self.leukocytes,
            MeasurementKind::Erythrocytes => self.erythrocytes,
            MeasurementKind::Hemoglobin => self.hemoglobin,
            MeasurementKind::Thrombocytes => self.thrombocytes,
        }
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Projects a layout into pixel primitives.
    ///
    /// Emits the x-axis, one segment per adjacent pair of series points, one
    /// connector per covered medication day, and one label per annotation with
    /// non-empty text. A flat Y domain (nothing plotted, nothing annotated) is
    /// widened to one unit so the projection stays defined.
    pub fn from_layout(
        layout: &ChartLayout,
        viewport: Viewport,
        style: &RenderStyle,
    ) -> LeukiResult<Self> {
        let viewport = viewport.validate()?;
        let axis = layout.axis;
        let y_max = if axis.y_max > axis.y_min {
            axis.y_max
        } else {
            axis.y_min + 1.0
        };
        let projector = Projector {
            x: LinearScale::new(axis.x_min as f64, axis.x_max as f64)?,
            y: LinearScale::new(axis.y_min, y_max)?,
            viewport,
        };

        let mut frame = Self::new(viewport);

        let (x1, y1) = projector.project(axis.x_min as f64, 0.0)?;
        let (x2, y2) = projector.project(axis.x_max as f64, 0.0)?;
        frame.lines.push(LinePrimitive {
            x1,
            y1,
            x2,
            y2,
            stroke_width: style.connector_stroke_width,
            color: style.axis,
            role: LineRole::Axis,
        });

        for (kind, points) in &layout.series.series {
            let color = style.series_color(*kind);
            for pair in points.windows(2) {
                let (x1, y1) = projector.project(pair[0].timestamp as f64, pair[0].value)?;
                let (x2, y2) = projector.project(pair[1].timestamp as f64, pair[1].value)?;
                frame.lines.push(LinePrimitive {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke_width: style.series_stroke_width,
                    color,
                    role: LineRole::Series,
                });
            }
        }

        for label in &layout.labels {
            let annotation = &label.annotation;
            for connector in &annotation.connectors {
                let (x1, y1) = projector.project(connector.label_timestamp as f64, label.label_y)?;
                let (x2, y2) = projector.project(connector.day_timestamp as f64, 0.0)?;
                frame.lines.push(LinePrimitive {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke_width: style.connector_stroke_width,
                    color: style.annotation,
                    role: LineRole::Connector,
                });
            }

            if annotation.text.is_empty() {
                trace!(event_index = annotation.event_index, "unlabelled annotation");
                continue;
            }
            let (x, y) = projector.project(annotation.placement.timestamp as f64, label.label_y)?;
            frame.texts.push(TextPrimitive {
                text: annotation.text.clone(),
                x,
                y,
                font_size_px: style.font_size_px,
                color: style.annotation,
                h_align: label_alignment(x, viewport.extent(Axis::X), style.label_edge_margin_px),
            });
        }

        frame.validate()?;
        Ok(frame)
    }

    pub fn validate(&self) -> LeukiResult<()> {
        self.viewport.validate()?;
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.texts.is_empty()
    }

    #[must_use]
    pub fn count_lines(&self, role: LineRole) -> usize {
        self.lines.iter().filter(|line| line.role == role).count()
    }
}

/// Keeps labels near the plot's side edges readable by anchoring them inwards.
fn label_alignment(x: f64, width: f64, margin: f64) -> TextHAlign {
    if x < margin {
        TextHAlign::Left
    } else if x > width - margin {
        TextHAlign::Right
    } else {
        TextHAlign::Center
    }
}

struct Projector {
    x: LinearScale,
    y: LinearScale,
    viewport: Viewport,
}

impl Projector {
    /// Data coordinates to pixels, with pixel Y growing downwards.
    fn project(&self, x: f64, y: f64) -> LeukiResult<(f64, f64)> {
        let height = self.viewport.extent(Axis::Y);
        let px = self.x.domain_to_pixel(x, self.viewport.extent(Axis::X))?;
        let py = height - self.y.domain_to_pixel(y, height)?;
        Ok((px, py))
    }
}

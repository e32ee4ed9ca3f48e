//! Chart layout engine.
//!
//! Turns the blood-sample and medication tables into plot-ready series, an
//! axis range and stacked annotation labels. Every function here is pure:
//! identical input yields identical output and source records are only
//! borrowed.

mod annotations;
mod axis;
mod config;
mod series;

pub use annotations::{
    AnnotationPlacement, AnnotationSet, ConnectorMark, PlacedAnnotation, place_annotations,
};
pub use axis::{AxisRange, compute_axis_range};
pub use config::LayoutConfig;
pub use series::{SeriesPoint, SeriesSet, build_series};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use self::axis::y_pixels_per_unit;
use crate::core::{BloodSample, MeasurementKind, MedicationEvent, PixelDensity};
use crate::error::{LeukiError, LeukiResult};

/// Borrowed input for one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub samples: &'a [BloodSample],
    pub events: &'a [MedicationEvent],
    pub enabled_kinds: &'a [MeasurementKind],
    pub show_annotations: bool,
}

impl<'a> LayoutRequest<'a> {
    #[must_use]
    pub fn new(samples: &'a [BloodSample], events: &'a [MedicationEvent]) -> Self {
        Self {
            samples,
            events,
            enabled_kinds: &MeasurementKind::ALL,
            show_annotations: true,
        }
    }

    #[must_use]
    pub fn with_enabled_kinds(mut self, enabled_kinds: &'a [MeasurementKind]) -> Self {
        self.enabled_kinds = enabled_kinds;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, show: bool) -> Self {
        self.show_annotations = show;
        self
    }
}

/// Annotation resolved to its label height in data units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationLabel {
    #[serde(flatten)]
    pub annotation: PlacedAnnotation,
    /// Y of the label (negative, below the x-axis) in measurement units.
    pub label_y: f64,
}

/// Everything a render surface needs for one draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub series: SeriesSet,
    pub axis: AxisRange,
    pub labels: Vec<AnnotationLabel>,
    pub stack_depth: usize,
}

impl ChartLayout {
    pub fn to_json_pretty(&self) -> LeukiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LeukiError::InvalidDocument(format!("failed to serialize chart layout: {e}"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartLayoutEngine {
    config: LayoutConfig,
}

impl ChartLayoutEngine {
    pub fn new(config: LayoutConfig) -> LeukiResult<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    #[must_use]
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    #[must_use]
    pub fn build_series(
        &self,
        samples: &[BloodSample],
        enabled_kinds: &[MeasurementKind],
    ) -> SeriesSet {
        build_series(samples, enabled_kinds)
    }

    #[must_use]
    pub fn place_annotations(&self, events: &[MedicationEvent]) -> AnnotationSet {
        place_annotations(events)
    }

    pub fn compute_axis_range(
        &self,
        series: &SeriesSet,
        annotations: &AnnotationSet,
        density: &dyn PixelDensity,
    ) -> LeukiResult<AxisRange> {
        compute_axis_range(series, annotations, self.config, density)
    }

    /// Runs a full layout pass.
    ///
    /// Fails with `NoValidDates` before any axis work when no sample carries a
    /// parseable date.
    pub fn layout(
        &self,
        request: LayoutRequest<'_>,
        density: &dyn PixelDensity,
    ) -> LeukiResult<ChartLayout> {
        let series = self.build_series(request.samples, request.enabled_kinds);
        if !series.has_valid_dates() {
            info!(
                sample_count = request.samples.len(),
                "plot aborted: no valid date entries"
            );
            return Err(LeukiError::NoValidDates);
        }

        let annotations = if request.show_annotations {
            self.place_annotations(request.events)
        } else {
            AnnotationSet::default()
        };
        let axis = self.compute_axis_range(&series, &annotations, density)?;
        let stack_depth = annotations.stack_depth;

        let labels = if annotations.is_empty() {
            Vec::new()
        } else {
            let ppu = y_pixels_per_unit(density)?;
            annotations
                .annotations
                .into_iter()
                .map(|annotation| {
                    let offset_px = self.config.label_offset_px(annotation.placement.stack_index);
                    AnnotationLabel {
                        annotation,
                        label_y: -offset_px / ppu,
                    }
                })
                .collect()
        };

        debug!(
            point_count = series.point_count(),
            label_count = labels.len(),
            stack_depth,
            "chart layout complete"
        );

        Ok(ChartLayout {
            series,
            axis,
            labels,
            stack_depth,
        })
    }
}

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{BloodSample, MeasurementKind};

/// One plotted measurement at date precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Series per enabled measurement kind, in canonical kind order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSet {
    pub series: IndexMap<MeasurementKind, Vec<SeriesPoint>>,
    /// Earliest and latest timestamp among samples with a well-formed date,
    /// whether or not any of their measurements are plotted.
    pub date_span: Option<(i64, i64)>,
}

impl SeriesSet {
    #[must_use]
    pub fn get(&self, kind: MeasurementKind) -> Option<&[SeriesPoint]> {
        self.series.get(&kind).map(Vec::as_slice)
    }

    /// Largest value across every series; `None` when no points were emitted.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.series
            .values()
            .flatten()
            .map(|point| OrderedFloat(point.value))
            .max()
            .map(OrderedFloat::into_inner)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn has_valid_dates(&self) -> bool {
        self.date_span.is_some()
    }
}

/// Converts blood samples into one series per enabled kind.
///
/// A sample contributes to a series only when its date is well-formed and its
/// cell for that kind holds a number. Each kind is filtered independently, and
/// points keep the input order.
#[must_use]
pub fn build_series(samples: &[BloodSample], enabled_kinds: &[MeasurementKind]) -> SeriesSet {
    let timestamps: Vec<Option<i64>> = samples.iter().map(BloodSample::timestamp).collect();

    let mut date_span: Option<(i64, i64)> = None;
    for (row, timestamp) in timestamps.iter().enumerate() {
        match timestamp {
            Some(ts) => {
                date_span = Some(match date_span {
                    Some((min, max)) => (min.min(*ts), max.max(*ts)),
                    None => (*ts, *ts),
                });
            }
            None => trace!(row, date = %samples[row].date, "skipping sample with malformed date"),
        }
    }

    let mut series = IndexMap::with_capacity(enabled_kinds.len());
    for kind in MeasurementKind::ALL {
        if !enabled_kinds.contains(&kind) {
            continue;
        }
        let points: Vec<SeriesPoint> = samples
            .iter()
            .zip(&timestamps)
            .filter_map(|(sample, timestamp)| {
                let timestamp = (*timestamp)?;
                let value = sample.measurement(kind).value()?;
                Some(SeriesPoint::new(timestamp, value))
            })
            .collect();
        series.insert(kind, points);
    }

    let set = SeriesSet { series, date_span };
    debug!(
        sample_count = samples.len(),
        series_count = set.series.len(),
        point_count = set.point_count(),
        has_valid_dates = set.has_valid_dates(),
        "built measurement series"
    );
    set
}

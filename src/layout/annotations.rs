use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{MAX_DURATION_DAYS, MedicationEvent, SECONDS_PER_DAY, SECONDS_PER_HALF_DAY};

/// Where a medication label sits on the time axis and how deep it is stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPlacement {
    pub timestamp: i64,
    /// Number of earlier annotations with exactly the same timestamp.
    pub stack_index: usize,
}

/// Line from a label down to the x-axis at one covered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMark {
    pub label_timestamp: i64,
    pub day_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedAnnotation {
    /// Index of the source event in the input slice.
    pub event_index: usize,
    pub text: String,
    pub placement: AnnotationPlacement,
    pub connectors: SmallVec<[ConnectorMark; 4]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationSet {
    pub annotations: Vec<PlacedAnnotation>,
    /// Highest number of annotations sharing one timestamp; 0 when empty.
    pub stack_depth: usize,
}

impl AnnotationSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn connector_count(&self) -> usize {
        self.annotations.iter().map(|a| a.connectors.len()).sum()
    }
}

/// Places medication labels at the midpoint of each event's day span.
///
/// Events with a malformed start date are skipped. Only labels whose
/// timestamps are exactly equal share a stack; near neighbours are left to
/// overlap. Output order follows input order.
#[must_use]
pub fn place_annotations(events: &[MedicationEvent]) -> AnnotationSet {
    let mut stack_counts: HashMap<i64, usize> = HashMap::new();
    let mut annotations = Vec::with_capacity(events.len());
    let mut stack_depth = 0;

    for (event_index, event) in events.iter().enumerate() {
        let Some(start) = event.start_timestamp() else {
            trace!(
                event_index,
                date = %event.start_date,
                "skipping medication with malformed start date"
            );
            continue;
        };

        let days = event.duration_days.clamp(1, MAX_DURATION_DAYS);
        if days != event.duration_days {
            warn!(
                event_index,
                days = event.duration_days,
                max = MAX_DURATION_DAYS,
                "clamping medication duration"
            );
        }
        let timestamp = midpoint_timestamp(start, days);

        let count = stack_counts.entry(timestamp).or_insert(0);
        let stack_index = *count;
        *count += 1;
        stack_depth = stack_depth.max(*count);

        let connectors = (0..i64::from(days))
            .map(|day| ConnectorMark {
                label_timestamp: timestamp,
                day_timestamp: start + day * SECONDS_PER_DAY,
            })
            .collect();

        annotations.push(PlacedAnnotation {
            event_index,
            text: event.label(),
            placement: AnnotationPlacement {
                timestamp,
                stack_index,
            },
            connectors,
        });
    }

    debug!(
        event_count = events.len(),
        placed_count = annotations.len(),
        stack_depth,
        "placed medication annotations"
    );

    AnnotationSet {
        annotations,
        stack_depth,
    }
}

/// `start + (days - 1) / 2` days, in whole seconds.
fn midpoint_timestamp(start: i64, days: u32) -> i64 {
    start + i64::from(days - 1) * SECONDS_PER_HALF_DAY
}

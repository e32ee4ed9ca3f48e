use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::date::cell_to_epoch_seconds;

/// Blood-count measurement plotted as its own series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementKind {
    Leukocytes,
    Erythrocytes,
    Hemoglobin,
    Thrombocytes,
}

impl MeasurementKind {
    /// Canonical order used for series maps and table columns.
    pub const ALL: [Self; 4] = [
        Self::Leukocytes,
        Self::Erythrocytes,
        Self::Hemoglobin,
        Self::Thrombocytes,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Leukocytes => "Leukocytes",
            Self::Erythrocytes => "Erythrocytes",
            Self::Hemoglobin => "Hemoglobin",
            Self::Thrombocytes => "Thrombocytes",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One measurement cell of the blood-sample table.
///
/// Numbers loaded from disk become `Value`; anything typed or loaded as text
/// stays `Raw` so the user sees exactly what was entered.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementCell {
    Value(f64),
    Raw(String),
}

impl Default for MeasurementCell {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl MeasurementCell {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Usable numeric value, if any. Blank and non-numeric text yield `None`.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value).filter(|v| v.is_finite()),
            Self::Raw(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Value(value) => value.to_string(),
            Self::Raw(text) => text.clone(),
        }
    }
}

impl From<f64> for MeasurementCell {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for MeasurementCell {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_owned())
    }
}

impl Serialize for MeasurementCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(""),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Number(f64),
    Text(String),
    Null(()),
}

impl<'de> Deserialize<'de> for MeasurementCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match CellRepr::deserialize(deserializer)? {
            CellRepr::Number(value) => Self::Value(value),
            CellRepr::Text(text) => Self::Raw(text),
            CellRepr::Null(()) => Self::default(),
        })
    }
}

/// One row of the blood-sample table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloodSample {
    /// Raw `dd.MM.yyyy` cell text; kept even when malformed.
    pub date: String,
    pub leukocytes: MeasurementCell,
    pub erythrocytes: MeasurementCell,
    pub hemoglobin: MeasurementCell,
    pub thrombocytes: MeasurementCell,
}

impl BloodSample {
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_measurement(
        mut self,
        kind: MeasurementKind,
        cell: impl Into<MeasurementCell>,
    ) -> Self {
        *self.measurement_mut(kind) = cell.into();
        self
    }

    #[must_use]
    pub fn measurement(&self, kind: MeasurementKind) -> &MeasurementCell {
        match kind {
            MeasurementKind::Leukocytes => &self.leukocytes,
            MeasurementKind::Erythrocytes => &self.erythrocytes,
            MeasurementKind::Hemoglobin => &self.hemoglobin,
            MeasurementKind::Thrombocytes => &self.thrombocytes,
        }
    }

    pub fn measurement_mut(&mut self, kind: MeasurementKind) -> &mut MeasurementCell {
        match kind {
            MeasurementKind::Leukocytes => &mut self.leukocytes,
            MeasurementKind::Erythrocytes => &mut self.erythrocytes,
            MeasurementKind::Hemoglobin => &mut self.hemoglobin,
            MeasurementKind::Thrombocytes => &mut self.thrombocytes,
        }
    }

    /// Epoch seconds of the sample date, or `None` when the cell is malformed.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        cell_to_epoch_seconds(&self.date)
    }
}

/// One chemotherapy or medication entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEvent {
    #[serde(rename = "date", default)]
    pub start_date: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "dose", default)]
    pub dose_per_day: String,
    #[serde(
        rename = "days",
        default = "default_duration_days",
        serialize_with = "serialize_days",
        deserialize_with = "deserialize_days"
    )]
    pub duration_days: u32,
}

impl Default for MedicationEvent {
    fn default() -> Self {
        Self {
            start_date: String::new(),
            name: String::new(),
            dose_per_day: String::new(),
            duration_days: default_duration_days(),
        }
    }
}

impl MedicationEvent {
    #[must_use]
    pub fn new(start_date: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dose(mut self, dose_per_day: impl Into<String>) -> Self {
        self.dose_per_day = dose_per_day.into();
        self
    }

    /// Sets the span in days, clamped to `1..=MAX_DURATION_DAYS`.
    #[must_use]
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = clamp_duration_days(u64::from(days));
        self
    }

    #[must_use]
    pub fn start_timestamp(&self) -> Option<i64> {
        cell_to_epoch_seconds(&self.start_date)
    }

    /// Text shown in the chart annotation.
    #[must_use]
    pub fn label(&self) -> String {
        let name = self.name.trim();
        let dose = self.dose_per_day.trim();
        if dose.is_empty() {
            name.to_owned()
        } else {
            format!("{name} {dose}")
        }
    }
}

/// Longest medication span in days; one connector mark is drawn per day.
pub const MAX_DURATION_DAYS: u32 = 366;

/// Parses a `days` cell; blank, non-numeric or zero input falls back to one day.
///
/// Longer spans are clamped to [`MAX_DURATION_DAYS`].
#[must_use]
pub fn parse_duration_days(text: &str) -> u32 {
    text.trim()
        .parse::<u64>()
        .map_or_else(|_| default_duration_days(), clamp_duration_days)
}

const fn default_duration_days() -> u32 {
    1
}

fn clamp_duration_days(days: u64) -> u32 {
    match u32::try_from(days) {
        Ok(0) => default_duration_days(),
        Ok(days) if days <= MAX_DURATION_DAYS => days,
        _ => {
            warn!(days, max = MAX_DURATION_DAYS, "clamping medication duration");
            MAX_DURATION_DAYS
        }
    }
}

fn serialize_days<S: Serializer>(days: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(days)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DaysRepr {
    Number(u64),
    Negative(i64),
    Text(String),
}

fn deserialize_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match DaysRepr::deserialize(deserializer)? {
        DaysRepr::Number(days) => clamp_duration_days(days),
        DaysRepr::Negative(_) => default_duration_days(),
        DaysRepr::Text(text) => parse_duration_days(&text),
    })
}

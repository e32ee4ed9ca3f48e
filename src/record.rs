//! Patient record document.
//!
//! The on-disk shape is a flat JSON object with camelCase keys. Measurement
//! cells are written as numbers when they parse and as `""` otherwise, so a
//! load/save cycle normalizes non-numeric text to empty cells.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{BloodSample, MedicationEvent};
use crate::error::{LeukiError, LeukiResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub date_of_birth: String,
    pub size: String,
    pub weight: String,
    pub body_surface: String,
    pub blood_samples: Vec<BloodSample>,
    #[serde(rename = "chemoTherapyAndMedicamentation")]
    pub medications: Vec<MedicationEvent>,
}

impl PatientRecord {
    pub fn from_json_str(input: &str) -> LeukiResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            LeukiError::InvalidDocument(format!("failed to parse patient record: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> LeukiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LeukiError::InvalidDocument(format!("failed to serialize patient record: {e}"))
        })
    }

    pub fn load(path: &Path) -> LeukiResult<Self> {
        let raw = read_file(path)?;
        let record = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            blood_samples = record.blood_samples.len(),
            medications = record.medications.len(),
            "loaded patient record"
        );
        Ok(record)
    }

    pub fn save(&self, path: &Path) -> LeukiResult<()> {
        let json = self.to_json_pretty()?;
        write_file(path, &json)?;
        debug!(path = %path.display(), "saved patient record");
        Ok(())
    }
}

pub(crate) fn read_file(path: &Path) -> LeukiResult<String> {
    fs::read_to_string(path).map_err(|err| LeukiError::UnreadableOrMissingFile {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

pub(crate) fn write_file(path: &Path, contents: &str) -> LeukiResult<()> {
    fs::write(path, contents).map_err(|err| LeukiError::UnreadableOrMissingFile {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

//! Persisted application settings and the settings dialog's edit buffer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::MeasurementKind;
use crate::error::{LeukiError, LeukiResult};
use crate::record::{read_file, write_file};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub previous_patient_data_file_name: String,
    pub active_tab_index: u32,
    pub auto_load_patient_data_file_on_startup: bool,
    pub visualization_show_leukocytes: bool,
    pub visualization_show_erythrocytes: bool,
    pub visualization_show_hemoglobin: bool,
    pub visualization_show_thrombocytes: bool,
    pub visualization_show_chemo_therapy_and_medicamentation: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            previous_patient_data_file_name: String::new(),
            active_tab_index: 0,
            auto_load_patient_data_file_on_startup: false,
            visualization_show_leukocytes: true,
            visualization_show_erythrocytes: true,
            visualization_show_hemoglobin: true,
            visualization_show_thrombocytes: true,
            visualization_show_chemo_therapy_and_medicamentation: true,
        }
    }
}

impl AppSettings {
    pub fn from_json_str(input: &str) -> LeukiResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| LeukiError::InvalidDocument(format!("failed to parse settings: {e}")))
    }

    pub fn to_json_pretty(&self) -> LeukiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LeukiError::InvalidDocument(format!("failed to serialize settings: {e}")))
    }

    /// Loads settings, writing the default payload first when the file is absent.
    pub fn load_or_init(path: &Path) -> LeukiResult<Self> {
        if !path.exists() {
            let defaults = Self::default();
            defaults.save(path)?;
            info!(path = %path.display(), "wrote default settings");
            return Ok(defaults);
        }
        let settings = Self::from_json_str(&read_file(path)?)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> LeukiResult<()> {
        write_file(path, &self.to_json_pretty()?)
    }

    #[must_use]
    pub fn shows_kind(&self, kind: MeasurementKind) -> bool {
        match kind {
            MeasurementKind::Leukocytes => self.visualization_show_leukocytes,
            MeasurementKind::Erythrocytes => self.visualization_show_erythrocytes,
            MeasurementKind::Hemoglobin => self.visualization_show_hemoglobin,
            MeasurementKind::Thrombocytes => self.visualization_show_thrombocytes,
        }
    }

    pub fn set_shows_kind(&mut self, kind: MeasurementKind, show: bool) {
        let flag = match kind {
            MeasurementKind::Leukocytes => &mut self.visualization_show_leukocytes,
            MeasurementKind::Erythrocytes => &mut self.visualization_show_erythrocytes,
            MeasurementKind::Hemoglobin => &mut self.visualization_show_hemoglobin,
            MeasurementKind::Thrombocytes => &mut self.visualization_show_thrombocytes,
        };
        *flag = show;
    }

    /// Kinds ticked in the visualization tab, in canonical order.
    #[must_use]
    pub fn enabled_kinds(&self) -> Vec<MeasurementKind> {
        MeasurementKind::ALL
            .into_iter()
            .filter(|kind| self.shows_kind(*kind))
            .collect()
    }

    #[must_use]
    pub fn shows_annotations(&self) -> bool {
        self.visualization_show_chemo_therapy_and_medicamentation
    }

    /// Previously opened patient file, if one is remembered.
    #[must_use]
    pub fn previous_file(&self) -> Option<&Path> {
        let name = self.previous_patient_data_file_name.trim();
        (!name.is_empty()).then(|| Path::new(name))
    }
}

/// Edit buffer behind the settings dialog.
///
/// Edits go to the staged copy; `accept` commits them and `reject` throws
/// them away by restoring the staged copy from the committed one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsEditor {
    committed: AppSettings,
    staged: AppSettings,
}

impl SettingsEditor {
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        Self {
            staged: settings.clone(),
            committed: settings,
        }
    }

    #[must_use]
    pub fn committed(&self) -> &AppSettings {
        &self.committed
    }

    #[must_use]
    pub fn staged(&self) -> &AppSettings {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut AppSettings {
        &mut self.staged
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.staged != self.committed
    }

    pub fn accept(&mut self) -> &AppSettings {
        self.committed = self.staged.clone();
        &self.committed
    }

    pub fn reject(&mut self) {
        self.staged = self.committed.clone();
    }

    #[must_use]
    pub fn into_committed(self) -> AppSettings {
        self.committed
    }
}

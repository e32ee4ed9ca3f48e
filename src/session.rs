//! Session controller owning the editable form and table state.
//!
//! A UI shell forwards user edits here and asks for chart layouts. All state
//! that a widget toolkit would keep in globals lives in explicit fields: the
//! unsaved-changes flag, the flag that marks programmatic table population,
//! the open file, and the last successful layout.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::core::{
    BloodSample, MeasurementCell, MeasurementKind, MedicationEvent, PixelDensity, Viewport,
    format_date, parse_date,
};
use crate::error::{LeukiError, LeukiResult};
use crate::layout::{ChartLayout, ChartLayoutEngine, LayoutConfig, LayoutRequest};
use crate::record::PatientRecord;
use crate::render::{RenderFrame, RenderStyle, RenderSurface};
use crate::settings::AppSettings;

/// Free-text patient fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Name,
    DateOfBirth,
    Size,
    Weight,
    BodySurface,
}

/// Result of editing a date cell.
#[derive(Debug)]
pub struct DateEdit {
    /// Row index of the edited record after any re-sort.
    pub row: usize,
    /// `MalformedDate` when the new text fails `dd.MM.yyyy`; the text is kept.
    pub error: Option<LeukiError>,
}

impl DateEdit {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of an open or save that reached the patient file.
#[derive(Debug)]
pub struct FileCommit {
    pub path: PathBuf,
    /// Failure to remember `path` in the settings file. The open or save
    /// itself already took effect.
    pub settings_error: Option<LeukiError>,
}

impl FileCommit {
    #[must_use]
    pub fn settings_persisted(&self) -> bool {
        self.settings_error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    record: PatientRecord,
    settings: AppSettings,
    settings_path: Option<PathBuf>,
    current_file: Option<PathBuf>,
    dirty: bool,
    suppress_edit_handling: bool,
    engine: ChartLayoutEngine,
    last_layout: Option<ChartLayout>,
}

impl Session {
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> LeukiResult<Self> {
        self.engine = ChartLayoutEngine::new(config)?;
        Ok(self)
    }

    /// Loads settings from `settings_path`, writing defaults on first run.
    ///
    /// Auto-loading the previous patient file is a separate step, see
    /// [`Session::auto_load`], so a missing patient file never prevents the
    /// session from starting.
    pub fn startup(settings_path: &Path) -> LeukiResult<Self> {
        let settings = AppSettings::load_or_init(settings_path)?;
        let mut session = Self::new(settings);
        session.settings_path = Some(settings_path.to_path_buf());
        Ok(session)
    }

    /// Opens the remembered patient file when auto-load is enabled.
    ///
    /// Returns `Ok(false)` when auto-load is off or no file is remembered.
    pub fn auto_load(&mut self) -> LeukiResult<bool> {
        if !self.settings.auto_load_patient_data_file_on_startup {
            return Ok(false);
        }
        let Some(path) = self.settings.previous_file().map(Path::to_path_buf) else {
            return Ok(false);
        };
        if !path.exists() {
            warn!(path = %path.display(), "auto-load file is missing");
            return Err(LeukiError::UnreadableOrMissingFile {
                path,
                reason: "file does not exist".to_owned(),
            });
        }
        self.open(&path)?;
        Ok(true)
    }

    #[must_use]
    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    #[must_use]
    pub fn blood_samples(&self) -> &[BloodSample] {
        &self.record.blood_samples
    }

    #[must_use]
    pub fn medications(&self) -> &[MedicationEvent] {
        &self.record.medications
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn is_suppressing_edits(&self) -> bool {
        self.suppress_edit_handling
    }

    #[must_use]
    pub fn last_layout(&self) -> Option<&ChartLayout> {
        self.last_layout.as_ref()
    }

    /// Runs `f` with edit handling suppressed, restoring the previous state after.
    ///
    /// Cell edits made inside `f` are stored verbatim without re-sorting,
    /// validation or touching the dirty flag.
    pub fn with_suppressed_edits<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.suppress_edit_handling, true);
        let out = f(self);
        self.suppress_edit_handling = previous;
        out
    }

    /// Replaces every table with `record` as a programmatic fill.
    pub fn populate(&mut self, record: PatientRecord) {
        self.with_suppressed_edits(|session| {
            session.record = record;
            session.last_layout = None;
        });
        debug!(
            blood_samples = self.record.blood_samples.len(),
            medications = self.record.medications.len(),
            "populated session tables"
        );
    }

    /// Starts an empty patient record with no file attached.
    pub fn new_record(&mut self) {
        self.populate(PatientRecord::default());
        self.current_file = None;
        self.dirty = false;
    }

    pub fn set_patient_field(&mut self, field: PatientField, text: impl Into<String>) {
        let slot = match field {
            PatientField::Name => &mut self.record.name,
            PatientField::DateOfBirth => &mut self.record.date_of_birth,
            PatientField::Size => &mut self.record.size,
            PatientField::Weight => &mut self.record.weight,
            PatientField::BodySurface => &mut self.record.body_surface,
        };
        *slot = text.into();
        self.mark_dirty();
    }

    /// Appends a blood sample dated `today` and returns its row after sorting.
    pub fn add_blood_sample(&mut self, today: NaiveDate) -> usize {
        self.record
            .blood_samples
            .push(BloodSample::new(format_date(today)));
        let row = self.record.blood_samples.len() - 1;
        let row = self.resort_blood_samples(row);
        self.mark_dirty();
        row
    }

    pub fn edit_blood_sample_date(
        &mut self,
        row: usize,
        text: impl Into<String>,
    ) -> LeukiResult<DateEdit> {
        let len = self.record.blood_samples.len();
        let sample = self
            .record
            .blood_samples
            .get_mut(row)
            .ok_or(LeukiError::RowOutOfRange { row, len })?;
        sample.date = text.into();

        if self.suppress_edit_handling {
            return Ok(DateEdit { row, error: None });
        }

        let error = parse_date(&self.record.blood_samples[row].date).err();
        if let Some(err) = &error {
            debug!(row, error = %err, "blood sample date rejected");
        }
        let row = self.resort_blood_samples(row);
        self.mark_dirty();
        Ok(DateEdit { row, error })
    }

    pub fn edit_measurement(
        &mut self,
        row: usize,
        kind: MeasurementKind,
        text: impl Into<String>,
    ) -> LeukiResult<()> {
        let len = self.record.blood_samples.len();
        let sample = self
            .record
            .blood_samples
            .get_mut(row)
            .ok_or(LeukiError::RowOutOfRange { row, len })?;
        *sample.measurement_mut(kind) = MeasurementCell::from_text(text);
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_blood_sample(&mut self, row: usize) -> LeukiResult<BloodSample> {
        let len = self.record.blood_samples.len();
        if row >= len {
            return Err(LeukiError::RowOutOfRange { row, len });
        }
        let removed = self.record.blood_samples.remove(row);
        self.mark_dirty();
        Ok(removed)
    }

    /// Appends a medication entry and reports whether its start date is valid.
    pub fn add_medication(&mut self, event: MedicationEvent) -> DateEdit {
        let error = self.check_date(&event.start_date);
        self.record.medications.push(event);
        self.mark_dirty();
        DateEdit {
            row: self.record.medications.len() - 1,
            error,
        }
    }

    pub fn edit_medication(
        &mut self,
        row: usize,
        event: MedicationEvent,
    ) -> LeukiResult<DateEdit> {
        let len = self.record.medications.len();
        let error = self.check_date(&event.start_date);
        let slot = self
            .record
            .medications
            .get_mut(row)
            .ok_or(LeukiError::RowOutOfRange { row, len })?;
        *slot = event;
        self.mark_dirty();
        Ok(DateEdit { row, error })
    }

    pub fn remove_medication(&mut self, row: usize) -> LeukiResult<MedicationEvent> {
        let len = self.record.medications.len();
        if row >= len {
            return Err(LeukiError::RowOutOfRange { row, len });
        }
        let removed = self.record.medications.remove(row);
        self.mark_dirty();
        Ok(removed)
    }

    pub fn set_show_kind(&mut self, kind: MeasurementKind, show: bool) {
        self.settings.set_shows_kind(kind, show);
    }

    pub fn set_show_annotations(&mut self, show: bool) {
        self.settings
            .visualization_show_chemo_therapy_and_medicamentation = show;
    }

    pub fn set_active_tab(&mut self, index: u32) {
        self.settings.active_tab_index = index;
    }

    /// Replaces the settings, typically after the settings dialog was accepted.
    pub fn apply_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
    }

    /// Lays out the chart from the current tables and visualization toggles.
    ///
    /// On `NoValidDates` the previous layout is left untouched so the surface
    /// keeps showing the last good chart.
    pub fn plot(&mut self, density: &dyn PixelDensity) -> LeukiResult<&ChartLayout> {
        let enabled_kinds = self.settings.enabled_kinds();
        let request = LayoutRequest::new(&self.record.blood_samples, &self.record.medications)
            .with_enabled_kinds(&enabled_kinds)
            .with_annotations(self.settings.shows_annotations());
        let layout = self.engine.layout(request, density)?;
        Ok(&*self.last_layout.insert(layout))
    }

    /// Lays out the chart and hands the projected frame to `surface`.
    ///
    /// The label band depends on the surface's current density, so hosts call
    /// this on every zoom or resize, not only on data changes.
    pub fn redraw<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        viewport: Viewport,
        style: &RenderStyle,
    ) -> LeukiResult<()> {
        let layout = self.plot(&*surface)?;
        let frame = RenderFrame::from_layout(layout, viewport, style)?;
        surface.render(&frame)
    }

    /// Loads `path` into the tables.
    ///
    /// Once the record is loaded the session is committed; a failure to write
    /// the settings file is reported on the returned [`FileCommit`].
    pub fn open(&mut self, path: &Path) -> LeukiResult<FileCommit> {
        let record = PatientRecord::load(path)?;
        self.populate(record);
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        Ok(self.remember_file(path))
    }

    /// Saves to the current file.
    pub fn save(&mut self) -> LeukiResult<FileCommit> {
        let Some(path) = self.current_file.clone() else {
            return Err(LeukiError::InvalidData(
                "no patient data file selected; save under a new name first".to_owned(),
            ));
        };
        self.save_as(&path)
    }

    /// Writes the record to `path` and makes it the current file.
    ///
    /// Settings write failures are reported like in [`Session::open`].
    pub fn save_as(&mut self, path: &Path) -> LeukiResult<FileCommit> {
        self.record.save(path)?;
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        info!(path = %path.display(), "patient data saved");
        Ok(self.remember_file(path))
    }

    /// Writes settings back to the file they were loaded from, if any.
    pub fn persist_settings(&self) -> LeukiResult<()> {
        match &self.settings_path {
            Some(path) => self.settings.save(path),
            None => Ok(()),
        }
    }

    fn remember_file(&mut self, path: &Path) -> FileCommit {
        self.settings.previous_patient_data_file_name = path.display().to_string();
        let settings_error = self.persist_settings().err();
        if let Some(err) = &settings_error {
            warn!(path = %path.display(), error = %err, "could not remember patient file");
        }
        FileCommit {
            path: path.to_path_buf(),
            settings_error,
        }
    }

    fn check_date(&self, text: &str) -> Option<LeukiError> {
        if self.suppress_edit_handling {
            return None;
        }
        parse_date(text).err()
    }

    fn mark_dirty(&mut self) {
        if !self.suppress_edit_handling {
            self.dirty = true;
        }
    }

    /// Restores date order and returns the new index of the row at `row`.
    ///
    /// The sort is stable; rows with malformed dates keep their relative order
    /// after all dated rows.
    fn resort_blood_samples(&mut self, row: usize) -> usize {
        let samples = &mut self.record.blood_samples;
        let mut indexed: Vec<(usize, BloodSample)> = samples.drain(..).enumerate().collect();
        indexed.sort_by_key(|(_, sample)| {
            let timestamp = sample.timestamp();
            (timestamp.is_none(), timestamp)
        });
        let new_row = indexed
            .iter()
            .position(|(original, _)| *original == row)
            .unwrap_or(row);
        samples.extend(indexed.into_iter().map(|(_, sample)| sample));
        new_row
    }
}

use chrono::NaiveDate;
use leuki::core::{
    BloodSample, FixedDensity, MeasurementCell, MeasurementKind, MedicationEvent, Viewport,
};
use leuki::render::{NullRenderer, RenderStyle};
use leuki::session::PatientField;
use leuki::{AppSettings, LeukiError, PatientRecord, Session};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("leuki-session-{}-{name}", std::process::id()))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).expect("valid day")
}

fn dates(session: &Session) -> Vec<&str> {
    session
        .blood_samples()
        .iter()
        .map(|s| s.date.as_str())
        .collect()
}

fn unsorted_record() -> PatientRecord {
    PatientRecord {
        name: "Jane Doe".to_owned(),
        blood_samples: vec![
            BloodSample::new("10.01.2024").with_measurement(MeasurementKind::Leukocytes, 2.0),
            BloodSample::new("01.01.2024").with_measurement(MeasurementKind::Leukocytes, 3.0),
        ],
        medications: vec![
            MedicationEvent::new("02.01.2024", "Cytarabine")
                .with_dose("100 mg")
                .with_duration_days(3),
        ],
        ..PatientRecord::default()
    }
}

#[test]
fn populate_keeps_file_order_and_leaves_session_clean() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());

    assert_eq!(dates(&session), vec!["10.01.2024", "01.01.2024"]);
    assert!(!session.is_dirty());
    assert!(!session.is_suppressing_edits());
    assert_eq!(session.record().name, "Jane Doe");
}

#[test]
fn adding_a_sample_dates_it_today_and_keeps_date_order() {
    let mut session = Session::new(AppSettings::default());
    session.populate(PatientRecord {
        blood_samples: vec![BloodSample::new("01.01.2024"), BloodSample::new("10.01.2024")],
        ..PatientRecord::default()
    });

    let row = session.add_blood_sample(day(5));

    assert_eq!(row, 1);
    assert_eq!(dates(&session), vec!["01.01.2024", "05.01.2024", "10.01.2024"]);
    assert!(session.is_dirty());
}

#[test]
fn date_edit_resorts_and_reports_the_new_row() {
    let mut session = Session::new(AppSettings::default());
    session.populate(PatientRecord {
        blood_samples: vec![BloodSample::new("01.01.2024"), BloodSample::new("05.01.2024")],
        ..PatientRecord::default()
    });

    let edit = session
        .edit_blood_sample_date(0, "09.01.2024")
        .expect("edit");

    assert!(edit.is_valid());
    assert_eq!(edit.row, 1);
    assert_eq!(dates(&session), vec!["05.01.2024", "09.01.2024"]);
}

#[test]
fn malformed_date_edit_is_kept_and_reported() {
    let mut session = Session::new(AppSettings::default());
    session.populate(PatientRecord {
        blood_samples: vec![BloodSample::new("01.01.2024"), BloodSample::new("05.01.2024")],
        ..PatientRecord::default()
    });

    let edit = session.edit_blood_sample_date(0, "1.1.24").expect("edit");

    assert!(matches!(edit.error, Some(LeukiError::MalformedDate { .. })));
    assert_eq!(edit.row, 1);
    assert_eq!(dates(&session), vec!["05.01.2024", "1.1.24"]);
    assert!(session.is_dirty());
}

#[test]
fn suppressed_edits_are_stored_verbatim() {
    let mut session = Session::new(AppSettings::default());
    session.populate(PatientRecord {
        blood_samples: vec![BloodSample::new("01.01.2024"), BloodSample::new("05.01.2024")],
        ..PatientRecord::default()
    });

    let edit = session
        .with_suppressed_edits(|s| s.edit_blood_sample_date(0, "31.12.2024"))
        .expect("edit");

    assert!(edit.is_valid());
    assert_eq!(edit.row, 0);
    assert_eq!(dates(&session), vec!["31.12.2024", "05.01.2024"]);
    assert!(!session.is_dirty());
    assert!(!session.is_suppressing_edits());
}

#[test]
fn form_and_table_edits_mark_the_session_dirty() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());

    session.set_patient_field(PatientField::Weight, "61");
    assert!(session.is_dirty());
    assert_eq!(session.record().weight, "61");

    session
        .edit_measurement(1, MeasurementKind::Hemoglobin, "11,2")
        .expect("edit");
    assert_eq!(
        session.blood_samples()[1].hemoglobin,
        MeasurementCell::Raw("11,2".to_owned())
    );

    let added = session.add_medication(MedicationEvent::new("2024/01/03", "Ondansetron"));
    assert_eq!(added.row, 1);
    assert!(matches!(added.error, Some(LeukiError::MalformedDate { .. })));
    assert_eq!(session.medications()[1].start_date, "2024/01/03");

    let fixed = session
        .edit_medication(1, MedicationEvent::new("03.01.2024", "Ondansetron"))
        .expect("edit");
    assert!(fixed.is_valid());

    let removed = session.remove_medication(0).expect("remove");
    assert_eq!(removed.name, "Cytarabine");
    assert_eq!(session.medications().len(), 1);
}

#[test]
fn out_of_range_rows_are_rejected() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());

    let err = session
        .edit_blood_sample_date(5, "01.01.2024")
        .expect_err("must fail");
    assert!(matches!(err, LeukiError::RowOutOfRange { row: 5, len: 2 }));

    assert!(session.remove_blood_sample(2).is_err());
    assert!(session.remove_medication(1).is_err());
    assert!(session
        .edit_medication(3, MedicationEvent::new("01.01.2024", "x"))
        .is_err());
    assert!(!session.is_dirty());
}

#[test]
fn plot_follows_the_visualization_toggles() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    session.set_show_kind(MeasurementKind::Erythrocytes, false);
    session.set_show_annotations(false);

    let layout = session
        .plot(&FixedDensity::new(1.0, 1.0))
        .expect("layout");

    assert_eq!(layout.series.series.len(), 3);
    assert!(layout.series.get(MeasurementKind::Erythrocytes).is_none());
    assert!(layout.labels.is_empty());
    assert!(session.last_layout().is_some());
}

#[test]
fn failed_plot_keeps_the_previous_layout() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    let density = FixedDensity::new(1.0, 1.0);
    let previous = session.plot(&density).expect("layout").clone();

    // a malformed row sorts last, so row 0 always holds the remaining valid date
    for _ in 0..2 {
        session
            .edit_blood_sample_date(0, "not a date")
            .expect("edit");
    }
    let err = session.plot(&density).expect_err("must fail");

    assert!(matches!(err, LeukiError::NoValidDates));
    assert_eq!(session.last_layout(), Some(&previous));
}

#[test]
fn redraw_hands_a_projected_frame_to_the_surface() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    let mut surface = NullRenderer::new(FixedDensity::new(1.0, 2.0));

    session
        .redraw(&mut surface, Viewport::new(800, 400), &RenderStyle::default())
        .expect("redraw");

    // axis, one leukocyte segment, three connectors
    assert_eq!(surface.last_line_count, 5);
    assert_eq!(surface.last_text_count, 1);
    assert_eq!(surface.frames_rendered, 1);

    let zoomed_out = session.last_layout().expect("layout").axis.y_min;
    surface.set_density(FixedDensity::new(1.0, 10.0));
    session
        .redraw(&mut surface, Viewport::new(800, 400), &RenderStyle::default())
        .expect("redraw");

    assert!(session.last_layout().expect("layout").axis.y_min > zoomed_out);
    assert_eq!(surface.frames_rendered, 2);
}

#[test]
fn redraw_rejects_an_empty_viewport() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    let mut surface = NullRenderer::default();

    let err = session
        .redraw(&mut surface, Viewport::new(0, 300), &RenderStyle::default())
        .expect_err("must fail");

    assert!(matches!(err, LeukiError::InvalidViewport { width: 0, height: 300 }));
    assert_eq!(surface.frames_rendered, 0);
}

#[test]
fn save_requires_a_file_until_save_as() {
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    session.set_patient_field(PatientField::Name, "John Doe");

    assert!(matches!(session.save(), Err(LeukiError::InvalidData(_))));
    assert!(session.is_dirty());

    let path = temp_path("save-as.json");
    let commit = session.save_as(&path).expect("save as");
    assert!(commit.settings_persisted());
    assert!(!session.is_dirty());
    assert_eq!(session.current_file(), Some(path.as_path()));
    assert_eq!(
        session.settings().previous_file(),
        Some(path.as_path())
    );

    session.set_patient_field(PatientField::Size, "180");
    session.save().expect("save");
    assert!(!session.is_dirty());

    let mut reopened = Session::new(AppSettings::default());
    reopened.open(&path).expect("open");
    std::fs::remove_file(&path).ok();

    assert_eq!(reopened.record().name, "John Doe");
    assert_eq!(reopened.record().size, "180");
    assert!(!reopened.is_dirty());
}

#[test]
fn new_record_detaches_the_file() {
    let path = temp_path("detach.json");
    let mut session = Session::new(AppSettings::default());
    session.populate(unsorted_record());
    session.save_as(&path).expect("save as");
    std::fs::remove_file(&path).ok();

    session.new_record();

    assert!(session.blood_samples().is_empty());
    assert_eq!(session.current_file(), None);
    assert!(session.last_layout().is_none());
    assert!(!session.is_dirty());
}

#[test]
fn startup_auto_loads_the_previous_file_when_enabled() {
    let settings_path = temp_path("startup-settings.json");
    let data_path = temp_path("startup-data.json");
    unsorted_record().save(&data_path).expect("save data");
    AppSettings {
        previous_patient_data_file_name: data_path.display().to_string(),
        auto_load_patient_data_file_on_startup: true,
        ..AppSettings::default()
    }
    .save(&settings_path)
    .expect("save settings");

    let mut session = Session::startup(&settings_path).expect("startup");
    let loaded = session.auto_load().expect("auto load");

    std::fs::remove_file(&data_path).ok();
    std::fs::remove_file(&settings_path).ok();

    assert!(loaded);
    assert_eq!(session.blood_samples().len(), 2);
    assert_eq!(session.current_file(), Some(data_path.as_path()));
}

#[test]
fn auto_load_is_skipped_or_reported_without_ending_the_session() {
    let mut disabled = Session::new(AppSettings {
        previous_patient_data_file_name: "/nowhere/patient.json".to_owned(),
        ..AppSettings::default()
    });
    assert!(!disabled.auto_load().expect("skipped"));

    let mut missing = Session::new(AppSettings {
        previous_patient_data_file_name: temp_path("gone.json").display().to_string(),
        auto_load_patient_data_file_on_startup: true,
        ..AppSettings::default()
    });
    let err = missing.auto_load().expect_err("must fail");
    assert!(matches!(err, LeukiError::UnreadableOrMissingFile { .. }));

    missing.populate(unsorted_record());
    assert_eq!(missing.blood_samples().len(), 2);
}

#[test]
fn startup_writes_settings_on_first_run_and_persists_changes() {
    let settings_path = temp_path("persist-settings.json");
    std::fs::remove_file(&settings_path).ok();

    let mut session = Session::startup(&settings_path).expect("startup");
    assert!(settings_path.exists());

    session.set_active_tab(1);
    session.persist_settings().expect("persist");

    let reloaded = AppSettings::load_or_init(&settings_path).expect("reload");
    std::fs::remove_file(&settings_path).ok();
    assert_eq!(reloaded.active_tab_index, 1);
}

#[test]
fn settings_write_failures_do_not_undo_a_completed_save_or_open() {
    let settings_dir = temp_path("vanishing-settings");
    std::fs::create_dir_all(&settings_dir).expect("settings dir");
    let settings_path = settings_dir.join("settings.json");
    let data_path = temp_path("kept-data.json");

    let mut session = Session::startup(&settings_path).expect("startup");
    std::fs::remove_dir_all(&settings_dir).expect("remove settings dir");
    session.populate(unsorted_record());
    session.set_patient_field(PatientField::Name, "John Doe");

    let saved = session.save_as(&data_path).expect("record written");
    assert!(!saved.settings_persisted());
    assert!(matches!(
        saved.settings_error,
        Some(LeukiError::UnreadableOrMissingFile { .. })
    ));
    assert_eq!(saved.path, data_path);
    assert!(!session.is_dirty());
    assert_eq!(session.current_file(), Some(data_path.as_path()));
    assert_eq!(session.settings().previous_file(), Some(data_path.as_path()));

    session.new_record();
    let opened = session.open(&data_path).expect("record loaded");
    std::fs::remove_file(&data_path).ok();

    assert!(opened.settings_error.is_some());
    assert_eq!(session.record().name, "John Doe");
    assert_eq!(session.current_file(), Some(data_path.as_path()));
}

use noshow_analysis::{AnalysisConfig, ExportFormat, NoShowError, analyze, clean, run};

use crate::utils::{FixtureRow, random_rows, test_config, write_csv};

#[test]
fn full_run_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("appointments.csv"), &random_rows(600, 42));
    let output_dir = dir.path().join("out");
    let config = test_config(&input, &output_dir).with_export_format(Some(ExportFormat::Csv));

    let output = run(&config).unwrap();
    let report = &output.report;

    assert_eq!(report.cleaning.input_rows, 600);
    assert_eq!(report.overview.records, report.cleaning.output_rows);
    assert_eq!(
        report.status.showed + report.status.no_show,
        report.overview.records as u64
    );
    assert!((report.status.showed_share + report.status.no_show_share - 1.0).abs() < 1e-12);
    assert_eq!(report.health_flags.len(), 6);
    assert!(report.top_neighbourhoods.len() <= 10);
    assert!(report.overview.repeat_patients.len() <= 10);
    assert!(report.overview.columns.iter().all(|c| c.count == report.overview.records));

    assert!(output.files.json.exists());
    assert!(output.files.summary.exists());
    assert!(output_dir.join("crosstab_gender.csv").exists());
    assert!(output_dir.join("crosstab_weekday.csv").exists());
    assert!(output_dir.join("describe.csv").exists());
    assert!(output.export.as_ref().unwrap().exists());
    assert!(output.charts.len() >= 10);
    assert!(output.charts.iter().all(|p| p.exists()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output.files.json).unwrap()).unwrap();
    assert_eq!(json["cleaning"]["input_rows"], 600);
    assert_eq!(json["gender"]["test"]["kind"], "chi_square");
    assert_eq!(json["health_flags"].as_array().unwrap().len(), 6);
    let busiest = &json["overview"]["repeat_patients"][0];
    assert!(busiest["total_appointments"].as_u64().unwrap() >= 2);

    let summary = std::fs::read_to_string(&output.files.summary).unwrap();
    assert!(summary.contains("Q1 Appointment status"));
    assert!(summary.contains("Q8 Waiting days"));
    assert!(summary.contains("Q4/Q5 SMS received"));
    assert!(summary.contains("Q4/Q5 Hypertension"));
    assert!(!summary.contains("Q4/Q5 sms_received"));
}

#[test]
fn longer_waits_are_flagged_significant() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("appointments.csv"), &random_rows(3000, 9));
    let config = test_config(&input, dir.path()).with_plots(false);

    let report = run(&config).unwrap().report;

    // Fixture no-show probability rises with the wait
    assert!(report.waiting_days.means.no_show > report.waiting_days.means.showed);
    let test = report.waiting_days.test.unwrap();
    assert!(test.significant);
    assert!(report.significant_variables().contains(&"waiting_days"));
}

#[test]
fn plots_can_be_switched_off() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("a.csv"), &random_rows(100, 1));
    let output_dir = dir.path().join("out");

    let output = run(&test_config(&input, &output_dir).with_plots(false)).unwrap();
    assert!(output.charts.is_empty());
    assert!(output.export.is_none());
    assert!(!output_dir.join("charts").exists());
}

#[test]
fn toml_configuration_overrides_defaults() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        significance_level = 0.01
        top_n = 3
        write_plots = false
        export_format = "parquet"
        "#,
    )
    .unwrap();

    assert!((config.significance_level - 0.01).abs() < f64::EPSILON);
    assert_eq!(config.top_n, 3);
    assert!(!config.write_plots);
    assert_eq!(config.export_format, Some(ExportFormat::Parquet));
    assert!(config.fix_same_day);
}

#[test]
fn nothing_left_after_cleaning_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir.path().join("a.csv"),
        &[FixtureRow::new(1).with_age(-3)],
    );
    let config = test_config(&input, dir.path());

    let loaded = noshow_analysis::load_appointments(&config).unwrap();
    let (cleaned, report) = clean(loaded, true);
    assert!(cleaned.is_empty());

    let err = analyze(&cleaned, &report, &config).unwrap_err();
    assert!(matches!(err, NoShowError::ValidationError(_)));
    assert!(run(&config).is_err());
}

#[test]
fn invalid_configuration_is_rejected_before_loading() {
    let config = AnalysisConfig::default()
        .with_input_path("does-not-matter.csv")
        .with_significance_level(1.5);
    assert!(matches!(run(&config), Err(NoShowError::ConfigError(_))));
}

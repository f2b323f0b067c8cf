use noshow_analysis::loader::{InputFormat, read_csv};
use noshow_analysis::report::export_cleaned;
use noshow_analysis::{AppointmentStatus, ExportFormat, Gender, NoShowError, load_appointments};

use crate::utils::{FixtureRow, HEADER, random_rows, test_config, write_csv};

#[test]
fn loads_typed_appointments_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut row = FixtureRow::new(5_642_903).missed();
    row.patient_id = "2.98724998242960e+13".to_string();
    row.flags = [0, 1, 0, 0];
    row.handicap = 2;
    let input = write_csv(&dir.path().join("appointments.csv"), &[row, FixtureRow::new(2)]);

    let appointments = load_appointments(&test_config(&input, dir.path())).unwrap();

    assert_eq!(appointments.len(), 2);
    let first = &appointments[0];
    assert_eq!(first.patient_id, 29_872_499_824_296);
    assert_eq!(first.appointment_id, 5_642_903);
    assert_eq!(first.gender, Gender::Female);
    assert!(first.hypertension);
    assert!(!first.scholarship);
    assert_eq!(first.handicap, 2);
    assert_eq!(first.status, AppointmentStatus::NoShow);
    assert_eq!(first.waiting_days, 8);
    assert_eq!(first.weekday_name(), "Friday");
}

#[test]
fn header_order_does_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reordered.csv");
    // Move PatientId to the end and add an unused column
    let columns: Vec<&str> = HEADER.split(',').collect();
    let header = format!("{},Extra,{}", columns[1..].join(","), columns[0]);
    let row = FixtureRow::new(7);
    let values: Vec<String> = row.to_csv_line().split(',').map(str::to_string).collect();
    let line = format!("{},ignored,{}", values[1..].join(","), values[0]);
    std::fs::write(&path, format!("{header}\n{line}\n")).unwrap();

    let appointments = load_appointments(&test_config(&path, dir.path())).unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].patient_id, 1007);
    assert_eq!(appointments[0].appointment_id, 7);
}

#[test]
fn missing_column_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    let header = HEADER.replace(",Handcap", "");
    std::fs::write(&path, format!("{header}\n")).unwrap();

    let err = read_csv(&path, 16).unwrap_err();
    assert!(matches!(err, NoShowError::SchemaError(_)));
    assert!(err.to_string().contains("Handcap"));
}

#[test]
fn bad_values_name_the_appointment() {
    let dir = tempfile::tempdir().unwrap();
    let mut row = FixtureRow::new(42);
    row.gender = "X";
    let input = write_csv(&dir.path().join("bad.csv"), &[row]);

    let err = load_appointments(&test_config(&input, dir.path())).unwrap_err();
    assert!(matches!(err, NoShowError::ValidationError(_)));
    assert!(err.to_string().contains("appointment 42"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.csv");
    let err = load_appointments(&test_config(&input, dir.path())).unwrap_err();
    assert!(matches!(err, NoShowError::IoError { .. }));
}

#[test]
fn batches_preserve_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let rows = random_rows(300, 7);
    let input = write_csv(&dir.path().join("many.csv"), &rows);

    let appointments = load_appointments(&test_config(&input, dir.path()).with_batch_size(16)).unwrap();
    assert_eq!(appointments.len(), 300);
    let ids: Vec<i64> = appointments.iter().map(|a| a.appointment_id).collect();
    let expected: Vec<i64> = rows.iter().map(|r| r.appointment_id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn exported_parquet_can_be_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("src.csv"), &random_rows(50, 3));
    let appointments = load_appointments(&test_config(&input, dir.path())).unwrap();

    let path = export_cleaned(&appointments, dir.path(), ExportFormat::Parquet)
        .unwrap()
        .unwrap();
    assert_eq!(InputFormat::from_path(&path), InputFormat::Parquet);

    let file = std::fs::File::open(&path).unwrap();
    let reader = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(rows, 50);
}

#[test]
fn exported_csv_has_renamed_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("src.csv"), &[FixtureRow::new(1)]);
    let appointments = load_appointments(&test_config(&input, dir.path())).unwrap();

    let path = export_cleaned(&appointments, dir.path(), ExportFormat::Csv)
        .unwrap()
        .unwrap();
    let contents = std::fs::read_to_string(path).unwrap();
    let header = contents.lines().next().unwrap();
    assert!(header.starts_with("patient_id,appointment_id,gender"));
    assert!(header.ends_with("no_show,waiting_days,weekday"));
}

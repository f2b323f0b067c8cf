use noshow_analysis::{Appointment, Cleaner, RowFilter, clean, load_appointments};

use crate::utils::{FixtureRow, random_rows, test_config, write_csv};

fn load(rows: &[FixtureRow]) -> Vec<Appointment> {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("appointments.csv"), rows);
    load_appointments(&test_config(&input, dir.path())).unwrap()
}

#[test]
fn known_data_entry_errors_are_removed() {
    let rows = vec![
        FixtureRow::new(1).with_age(-1),
        FixtureRow::new(2).with_days("2016-05-10T10:17:48Z", "2016-05-04T00:00:00Z"),
        FixtureRow::new(3).with_days("2016-04-29T18:38:08Z", "2016-04-29T00:00:00Z"),
        FixtureRow::new(4),
    ];

    let (cleaned, report) = clean(load(&rows), true);

    assert_eq!(report.input_rows, 4);
    assert_eq!(report.output_rows, 2);
    assert_eq!(report.same_day_fixed, 1);
    assert_eq!(report.filters[0].removed, 1);
    assert_eq!(report.filters[1].removed, 1);
    let ids: Vec<i64> = cleaned.iter().map(|a| a.appointment_id).collect();
    assert_eq!(ids, [3, 4]);
    assert_eq!(cleaned[0].waiting_days, 0);
}

#[test]
fn cleaned_rows_satisfy_invariants() {
    let (cleaned, report) = clean(load(&random_rows(500, 11)), true);

    assert!(cleaned.iter().all(|a| a.age >= 0));
    assert!(cleaned.iter().all(|a| a.waiting_days >= 0));
    assert_eq!(report.output_rows, cleaned.len());
    assert_eq!(report.input_rows - report.removed_rows(), report.output_rows);
    assert!(report.removed_rows() >= 2);
    // Patients are drawn from a pool half the size of the table
    assert!(report.duplicate_patient_ids > 0);
    assert_eq!(report.duplicate_appointment_ids, 0);
}

#[derive(Debug)]
struct ReminderOnly;

impl RowFilter for ReminderOnly {
    fn name(&self) -> &str {
        "no reminder"
    }

    fn keep(&self, appointment: &Appointment) -> bool {
        appointment.sms_received
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec!["sms_received"]
    }
}

#[test]
fn extra_filters_are_reported_by_name() {
    let mut reminded = FixtureRow::new(2);
    reminded.sms_received = 1;
    let rows = vec![FixtureRow::new(1), reminded];

    let (cleaned, report) = Cleaner::new()
        .with_filter(Box::new(ReminderOnly))
        .clean(load(&rows));

    assert_eq!(cleaned.len(), 1);
    assert!(cleaned[0].sms_received);
    let last = report.filters.last().unwrap();
    assert_eq!(last.name, "no reminder");
    assert_eq!(last.removed, 1);
}
